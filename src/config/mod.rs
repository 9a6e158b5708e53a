pub mod cli;
pub mod document;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_locale, validate_path, validate_url, Validate};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "legaldoc-core")]
#[command(about = "Resolve a legal document, merge state compliance rules and render a draft")]
pub struct CliConfig {
    /// Path to the registry JSON produced by registry-build
    #[arg(long, default_value = "documents/registry.json")]
    pub registry: String,

    /// Template base: a local directory or an http(s) URL
    #[arg(long, default_value = "./templates")]
    pub templates: String,

    /// Document id to generate (e.g. vehicle-bill-of-sale)
    #[arg(long)]
    pub document: String,

    /// Jurisdiction: two-letter state code or full state name
    #[arg(long)]
    pub state: String,

    /// Output locale
    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Path to a JSON file with the answer set
    #[arg(long)]
    pub answers: Option<String>,

    /// Write the rendered draft here instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Show the resolved document, compliance and questions without rendering
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 模板來源是 HTTP 端點還是本地目錄
    pub fn templates_is_http(&self) -> bool {
        self.templates.starts_with("http://") || self.templates.starts_with("https://")
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("registry", &self.registry)?;
        if self.templates_is_http() {
            validate_url("templates", &self.templates)?;
        } else {
            validate_path("templates", &self.templates)?;
        }
        validate_locale("locale", &self.locale)?;
        crate::utils::validation::validate_non_empty_string("document", &self.document)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            registry: "documents/registry.json".to_string(),
            templates: "./templates".to_string(),
            document: "vehicle-bill-of-sale".to_string(),
            state: "FL".to_string(),
            locale: "en".to_string(),
            answers: None,
            output: None,
            verbose: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_http_template_base_is_accepted() {
        let mut config = base_config();
        config.templates = "https://templates.example.com/v1".to_string();
        assert!(config.templates_is_http());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_locale_is_rejected() {
        let mut config = base_config();
        config.locale = "english".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let mut config = base_config();
        config.document = String::new();
        assert!(config.validate().is_err());
    }
}
