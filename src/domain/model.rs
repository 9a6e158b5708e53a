use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 使用者在精靈流程填入的回答，以問題 id 為 key
pub type AnswerSet = HashMap<String, serde_json::Value>;

/// 文件適用的州範圍："all" 或明確列出的兩碼州代號
#[derive(Debug, Clone, PartialEq)]
pub enum StateScope {
    All,
    Listed(Vec<String>),
}

impl Default for StateScope {
    fn default() -> Self {
        StateScope::All
    }
}

impl StateScope {
    pub fn includes(&self, code: &str) -> bool {
        match self {
            StateScope::All => true,
            StateScope::Listed(codes) => codes.iter().any(|c| c == code),
        }
    }
}

impl Serialize for StateScope {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            StateScope::All => serializer.serialize_str("all"),
            StateScope::Listed(codes) => codes.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for StateScope {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Literal(String),
            Listed(Vec<String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Literal(s) if s == "all" => Ok(StateScope::All),
            Repr::Literal(s) => Err(serde::de::Error::custom(format!(
                "expected the literal \"all\" or a list of state codes, got \"{}\"",
                s
            ))),
            Repr::Listed(codes) => Ok(StateScope::Listed(codes)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
}

/// 單一欄位的驗證約束
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraint {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// 精靈表單的單一問題；questions 的順序決定步驟順序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub label_key: String,
    pub input_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDefinition {
    pub id: String,
    pub jurisdiction: String,
    pub category: String,
    pub language_support: Vec<String>,
    #[serde(default)]
    pub requires_notarization: bool,
    #[serde(default)]
    pub can_be_recorded: bool,
    #[serde(default)]
    pub offer_notarization: bool,
    #[serde(default)]
    pub offer_recording_help: bool,
    pub base_price: f64,
    #[serde(default)]
    pub states: StateScope,
    pub template_paths: BTreeMap<String, String>,
    pub schema: BTreeMap<String, FieldConstraint>,
    pub questions: Vec<Question>,
    pub translations: BTreeMap<String, Translation>,
}

impl DocumentDefinition {
    pub fn supports_locale(&self, locale: &str) -> bool {
        self.language_support.iter().any(|l| l == locale)
    }

    /// 取得指定語系的顯示名稱，找不到時退回 en
    pub fn display_name(&self, locale: &str) -> Option<&str> {
        self.translations
            .get(locale)
            .or_else(|| self.translations.get("en"))
            .map(|t| t.name.as_str())
    }
}

/// 州別合規覆蓋；None 的欄位保留基礎定義的值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceOverlay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_notary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_form_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// 覆蓋解析命中的層級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayTier {
    State,
    Default,
}

/// 基礎定義與州別覆蓋合併後的有效合規設定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveCompliance {
    pub document_id: String,
    pub state: String,
    pub tier: OverlayTier,
    pub requires_notary: bool,
    pub can_be_recorded: bool,
    pub witness_count: u32,
    pub official_form: Option<String>,
    pub local_form_path: Option<String>,
    pub schema_version: Option<String>,
    pub last_updated: Option<String>,
}

/// 驅動精靈表單的 schema 與問題序列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentForm {
    pub schema: BTreeMap<String, FieldConstraint>,
    pub questions: Vec<Question>,
}

/// 註冊表的單一項目；id 與 meta.id 必須一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub jurisdiction: String,
    pub meta: DocumentDefinition,
    #[serde(default)]
    pub overlays: BTreeMap<String, ComplianceOverlay>,
}

/// registry-build 產出的靜態註冊表檔案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryFile {
    pub manifest_version: String,
    pub generated_at: String,
    pub documents: Vec<RegistryEntry>,
}

pub const MANIFEST_VERSION: &str = "1";

/// 覆蓋表中代表「未列出的州」的保留 key
pub const DEFAULT_OVERLAY_KEY: &str = "DEFAULT";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_scope_all_roundtrip() {
        let json = serde_json::to_string(&StateScope::All).unwrap();
        assert_eq!(json, "\"all\"");
        let back: StateScope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateScope::All);
    }

    #[test]
    fn test_state_scope_listed_roundtrip() {
        let scope = StateScope::Listed(vec!["CA".to_string(), "FL".to_string()]);
        let json = serde_json::to_string(&scope).unwrap();
        let back: StateScope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scope);
        assert!(back.includes("FL"));
        assert!(!back.includes("TX"));
    }

    #[test]
    fn test_state_scope_rejects_other_literals() {
        let result: std::result::Result<StateScope, _> = serde_json::from_str("\"some\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_state_scope_all_includes_everything() {
        assert!(StateScope::All.includes("TX"));
        assert!(StateScope::All.includes("XX"));
    }

    #[test]
    fn test_overlay_defaults_to_no_overrides() {
        let overlay: ComplianceOverlay = serde_json::from_str("{}").unwrap();
        assert_eq!(overlay, ComplianceOverlay::default());
        assert!(overlay.requires_notary.is_none());
    }

    #[test]
    fn test_field_type_lowercase_names() {
        let ft: FieldType = serde_json::from_str("\"select\"").unwrap();
        assert_eq!(ft, FieldType::Select);
        assert_eq!(serde_json::to_string(&FieldType::Date).unwrap(), "\"date\"");
    }
}
