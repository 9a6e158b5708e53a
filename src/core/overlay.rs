use crate::core::jurisdiction::normalize_jurisdiction;
use crate::core::registry::DocumentRegistry;
use crate::domain::model::{
    ComplianceOverlay, EffectiveCompliance, OverlayTier, RegistryEntry, DEFAULT_OVERLAY_KEY,
};

/// 解析 (document_id, jurisdiction) 的有效合規設定。
///
/// 三層查找，優先序固定：
///   1. 正規化後的州代號命中覆蓋表
///   2. 文件層級的 DEFAULT 覆蓋
///   3. 都沒有 → None
///
/// 未知的文件 id 回傳 None；未知的州不是錯誤，僅降級處理。
/// 純函式：同樣輸入永遠得到同樣結果。
pub fn resolve_overlay(
    registry: &DocumentRegistry,
    document_id: &str,
    jurisdiction: &str,
) -> Option<EffectiveCompliance> {
    let entry = registry.get(document_id)?;
    let code = normalize_jurisdiction(jurisdiction);

    let (tier, overlay) = if let Some(overlay) = entry.overlays.get(&code) {
        (OverlayTier::State, overlay)
    } else if let Some(overlay) = entry.overlays.get(DEFAULT_OVERLAY_KEY) {
        tracing::debug!(
            "No overlay for '{}' in state '{}', using DEFAULT",
            document_id,
            code
        );
        (OverlayTier::Default, overlay)
    } else {
        tracing::warn!(
            "No overlay entry for '{}' in state '{}' and no DEFAULT",
            document_id,
            code
        );
        return None;
    };

    Some(merge_overlay(entry, overlay, tier, code))
}

/// 覆蓋欄位逐一蓋在基礎定義上；None 的欄位保留基礎值
fn merge_overlay(
    entry: &RegistryEntry,
    overlay: &ComplianceOverlay,
    tier: OverlayTier,
    state: String,
) -> EffectiveCompliance {
    EffectiveCompliance {
        document_id: entry.id.clone(),
        state,
        tier,
        requires_notary: overlay
            .requires_notary
            .unwrap_or(entry.meta.requires_notarization),
        can_be_recorded: entry.meta.can_be_recorded,
        witness_count: overlay.witness_count.unwrap_or(0),
        official_form: overlay.official_form.clone(),
        local_form_path: overlay.local_form_path.clone(),
        schema_version: overlay.schema_version.clone(),
        last_updated: overlay.last_updated.clone(),
    }
}
