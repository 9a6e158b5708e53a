use crate::core::loader::validate_answers;
use crate::core::overlay::resolve_overlay;
use crate::core::registry::DocumentRegistry;
use crate::core::renderer::TemplateRenderer;
use crate::domain::model::{AnswerSet, EffectiveCompliance};
use crate::domain::ports::TemplateSource;
use crate::utils::error::{DocError, Result};
use std::sync::Arc;

/// 一次產生請求的完整結果
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub document_id: String,
    pub state: String,
    pub locale: String,
    pub compliance: Option<EffectiveCompliance>,
    pub text: String,
}

/// 串起解析、驗證、渲染三個階段。
/// 底層各解析函式用 None 表達「找不到」；引擎是最外層，
/// 在這裡才轉成呼叫端看得懂的錯誤。
pub struct DraftEngine<T: TemplateSource> {
    registry: Arc<DocumentRegistry>,
    renderer: TemplateRenderer<T>,
}

impl<T: TemplateSource> DraftEngine<T> {
    pub fn new(registry: Arc<DocumentRegistry>, source: T) -> Self {
        Self {
            registry,
            renderer: TemplateRenderer::new(source),
        }
    }

    pub async fn generate(
        &self,
        document_id: &str,
        state: &str,
        locale: &str,
        answers: &AnswerSet,
    ) -> Result<DocumentDraft> {
        tracing::info!("📋 Resolving document '{}'", document_id);
        let entry = self
            .registry
            .get(document_id)
            .ok_or_else(|| DocError::DocumentNotFoundError {
                id: document_id.to_string(),
            })?;

        tracing::info!("⚖️ Resolving compliance for state '{}'", state);
        let compliance = resolve_overlay(&self.registry, document_id, state);
        match &compliance {
            Some(resolved) => tracing::info!(
                "⚖️ {} in {}: notary={}, witnesses={}",
                document_id,
                resolved.state,
                resolved.requires_notary,
                resolved.witness_count
            ),
            // 未知的州不是錯誤，以基礎定義繼續
            None => tracing::warn!(
                "⚖️ No compliance overlay for '{}' in '{}', continuing with base definition",
                document_id,
                state
            ),
        }

        tracing::info!("📝 Validating answers");
        let form = self
            .registry
            .form(document_id)
            .ok_or_else(|| DocError::DocumentNotFoundError {
                id: document_id.to_string(),
            })?;
        validate_answers(&form, answers)?;

        if !entry.meta.supports_locale(locale) {
            tracing::warn!(
                "📄 '{}' does not list locale '{}', falling back where possible",
                document_id,
                locale
            );
        }
        tracing::info!("📄 Rendering draft ({})", locale);
        let text = self.renderer.render(entry, locale, answers).await;
        if text.is_empty() {
            // 渲染器以空字串表示失敗，不能當成有效的空文件往外送
            return Err(DocError::TemplateRenderError {
                document_id: document_id.to_string(),
                locale: locale.to_string(),
            });
        }

        tracing::info!("✅ Draft ready ({} characters)", text.len());
        Ok(DocumentDraft {
            document_id: document_id.to_string(),
            state: state.to_string(),
            locale: locale.to_string(),
            compliance,
            text,
        })
    }
}
