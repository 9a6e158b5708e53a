use crate::domain::model::{
    ComplianceOverlay, DocumentDefinition, FieldConstraint, FieldType, Question, RegistryEntry,
    StateScope, Translation, DEFAULT_OVERLAY_KEY,
};
use crate::utils::error::{DocError, Result};
use crate::utils::validation::{
    self, validate_locale, validate_non_negative, validate_path, validate_slug,
    validate_state_code,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 單一文件定義的 TOML 來源格式，registry-build 逐檔載入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub document: DocumentSection,
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
    #[serde(default)]
    pub translations: BTreeMap<String, Translation>,
    #[serde(default)]
    pub schema: BTreeMap<String, FieldConstraint>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub overlays: BTreeMap<String, ComplianceOverlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSection {
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
}

impl DocumentConfig {
    /// 從 TOML 檔案載入文件定義
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DocError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析文件定義
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DocError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FORMS_BASE})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證定義的合理性；任何一項不過就讓整個建置失敗
    pub fn validate_config(&self) -> Result<()> {
        let doc = &self.document;

        validate_slug("document.id", &doc.id)?;
        validation::validate_non_empty_string("document.jurisdiction", &doc.jurisdiction)?;
        validation::validate_non_empty_string("document.category", &doc.category)?;
        validate_non_negative("document.base_price", doc.base_price)?;

        if !doc.language_support.iter().any(|l| l == "en") {
            return Err(DocError::InvalidConfigValueError {
                field: "document.language_support".to_string(),
                value: doc.language_support.join(","),
                reason: "Every document must at least support 'en'".to_string(),
            });
        }
        for locale in &doc.language_support {
            validate_locale("document.language_support", locale)?;

            // 每個支援的語系都要有模板路徑（語系對等要求）
            match self.templates.get(locale) {
                Some(path) => validate_path(&format!("templates.{}", locale), path)?,
                None => {
                    return Err(DocError::MissingConfigError {
                        field: format!("templates.{}", locale),
                    })
                }
            }
        }

        match self.translations.get("en") {
            Some(translation) if !translation.name.trim().is_empty() => {}
            _ => {
                return Err(DocError::MissingConfigError {
                    field: "translations.en.name".to_string(),
                })
            }
        }

        for (field, constraint) in &self.schema {
            if constraint.field_type == FieldType::Select
                && constraint.options.as_ref().map_or(true, |o| o.is_empty())
            {
                return Err(DocError::InvalidConfigValueError {
                    field: format!("schema.{}", field),
                    value: "select".to_string(),
                    reason: "Select fields must declare options".to_string(),
                });
            }
        }

        let mut seen_questions = std::collections::HashSet::new();
        for question in &self.questions {
            validation::validate_non_empty_string("questions.id", &question.id)?;
            if !seen_questions.insert(question.id.as_str()) {
                return Err(DocError::InvalidConfigValueError {
                    field: "questions".to_string(),
                    value: question.id.clone(),
                    reason: "Question ids must be unique".to_string(),
                });
            }
            if !self.schema.contains_key(&question.id) {
                return Err(DocError::InvalidConfigValueError {
                    field: "questions".to_string(),
                    value: question.id.clone(),
                    reason: "Every question must have a matching schema field".to_string(),
                });
            }
        }

        for state in self.overlays.keys() {
            validate_state_code("overlays", state)?;
        }

        if let StateScope::Listed(codes) = &doc.states {
            for code in codes {
                if code == DEFAULT_OVERLAY_KEY {
                    return Err(DocError::InvalidConfigValueError {
                        field: "document.states".to_string(),
                        value: code.clone(),
                        reason: "DEFAULT is reserved for the overlay table".to_string(),
                    });
                }
                validate_state_code("document.states", code)?;
            }
        }

        Ok(())
    }

    /// 轉成註冊表項目；id 同步到 entry 與 meta 兩處
    pub fn into_entry(self) -> RegistryEntry {
        let doc = self.document;
        RegistryEntry {
            id: doc.id.clone(),
            jurisdiction: doc.jurisdiction.clone(),
            meta: DocumentDefinition {
                id: doc.id,
                jurisdiction: doc.jurisdiction,
                category: doc.category,
                language_support: doc.language_support,
                requires_notarization: doc.requires_notarization,
                can_be_recorded: doc.can_be_recorded,
                offer_notarization: doc.offer_notarization,
                offer_recording_help: doc.offer_recording_help,
                base_price: doc.base_price,
                states: doc.states,
                template_paths: self.templates,
                schema: self.schema,
                questions: self.questions,
                translations: self.translations,
            },
            overlays: self.overlays,
        }
    }
}

impl crate::utils::validation::Validate for DocumentConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_TOML: &str = r#"
[document]
id = "vehicle-bill-of-sale"
jurisdiction = "us"
category = "vehicles"
language_support = ["en", "es"]
can_be_recorded = true
base_price = 19.95
states = "all"

[templates]
en = "en/vehicle-bill-of-sale.md"
es = "es/vehicle-bill-of-sale.md"

[translations.en]
name = "Vehicle Bill of Sale"
description = "Transfers vehicle ownership"
aliases = ["car bill of sale"]

[translations.es]
name = "Contrato de Compraventa de Vehículo"

[schema.seller_name]
type = "text"
required = true

[schema.sale_price]
type = "number"
required = true

[[questions]]
id = "seller_name"
label_key = "questions.vehicle.seller_name"
input_type = "text"
required = true

[[questions]]
id = "sale_price"
label_key = "questions.vehicle.sale_price"
input_type = "number"
required = true

[overlays.FL]
requires_notary = true
official_form = "HSMV 82050"
schema_version = "1.2"
last_updated = "2025-01-15"

[overlays.CA]
requires_notary = false
"#;

    #[test]
    fn test_parse_basic_document_config() {
        let config = DocumentConfig::from_toml_str(BASIC_TOML).unwrap();

        assert_eq!(config.document.id, "vehicle-bill-of-sale");
        assert_eq!(config.document.language_support, vec!["en", "es"]);
        assert_eq!(config.document.states, StateScope::All);
        assert_eq!(config.questions.len(), 2);
        assert_eq!(
            config.overlays.get("FL").unwrap().requires_notary,
            Some(true)
        );
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_into_entry_keeps_ids_in_sync() {
        let config = DocumentConfig::from_toml_str(BASIC_TOML).unwrap();
        let entry = config.into_entry();
        assert_eq!(entry.id, entry.meta.id);
        assert_eq!(entry.jurisdiction, "us");
        assert!(entry.overlays.contains_key("CA"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_FORMS_BASE", "forms/fl");

        let toml_content = r#"
[document]
id = "test-doc"
jurisdiction = "us"
category = "test"
language_support = ["en"]
base_price = 0.0

[templates]
en = "en/test-doc.md"

[translations.en]
name = "Test"

[overlays.FL]
local_form_path = "${TEST_FORMS_BASE}/form.pdf"
"#;

        let config = DocumentConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.overlays.get("FL").unwrap().local_form_path.as_deref(),
            Some("forms/fl/form.pdf")
        );

        std::env::remove_var("TEST_FORMS_BASE");
    }

    #[test]
    fn test_unknown_env_var_left_as_is() {
        let toml_content = r#"
[document]
id = "test-doc"
jurisdiction = "us"
category = "test"
language_support = ["en"]
base_price = 0.0

[templates]
en = "en/${DEFINITELY_NOT_SET_ANYWHERE}.md"

[translations.en]
name = "Test"
"#;
        let config = DocumentConfig::from_toml_str(toml_content).unwrap();
        assert!(config
            .templates
            .get("en")
            .unwrap()
            .contains("${DEFINITELY_NOT_SET_ANYWHERE}"));
    }

    #[test]
    fn test_missing_template_for_supported_locale_fails() {
        let toml_content = r#"
[document]
id = "test-doc"
jurisdiction = "us"
category = "test"
language_support = ["en", "es"]
base_price = 0.0

[templates]
en = "en/test-doc.md"

[translations.en]
name = "Test"
"#;
        let config = DocumentConfig::from_toml_str(toml_content).unwrap();
        let result = config.validate_config();
        assert!(matches!(
            result,
            Err(DocError::MissingConfigError { field }) if field == "templates.es"
        ));
    }

    #[test]
    fn test_uppercase_id_fails_validation() {
        let toml_content = BASIC_TOML.replace(
            "id = \"vehicle-bill-of-sale\"",
            "id = \"Vehicle-Bill-Of-Sale\"",
        );
        let config = DocumentConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_lowercase_overlay_key_fails_validation() {
        let toml_content = BASIC_TOML.replace("[overlays.FL]", "[overlays.fl]");
        let config = DocumentConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_question_without_schema_field_fails() {
        let toml_content = format!(
            "{}\n[[questions]]\nid = \"odometer\"\nlabel_key = \"q.odometer\"\ninput_type = \"number\"\n",
            BASIC_TOML
        );
        let config = DocumentConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_negative_price_fails() {
        let toml_content = BASIC_TOML.replace("base_price = 19.95", "base_price = -1.0");
        let config = DocumentConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC_TOML.as_bytes()).unwrap();

        let config = DocumentConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.document.id, "vehicle-bill-of-sale");
    }

    #[test]
    fn test_explicit_state_list_parses() {
        let toml_content = BASIC_TOML.replace("states = \"all\"", "states = [\"CA\", \"FL\"]");
        let config = DocumentConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(
            config.document.states,
            StateScope::Listed(vec!["CA".to_string(), "FL".to_string()])
        );
        assert!(config.validate_config().is_ok());
    }
}
