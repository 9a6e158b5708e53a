use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("Template fetch failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}' ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Duplicate document '{id}' in jurisdiction '{jurisdiction}'")]
    DuplicateDocumentError { jurisdiction: String, id: String },

    #[error("Registry integrity error: {message}")]
    RegistryIntegrityError { message: String },

    #[error("Document not found: {id}")]
    DocumentNotFoundError { id: String },

    #[error("Answer validation failed for '{field}': {message}")]
    AnswerValidationError { field: String, message: String },

    #[error("Template render failed for '{document_id}' ({locale})")]
    TemplateRenderError { document_id: String, locale: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Configuration,
    Registry,
    Validation,
    Rendering,
    Processing,
}

impl DocError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DocError::FetchError(_) => ErrorCategory::Network,
            DocError::IoError(_) => ErrorCategory::Io,
            DocError::SerializationError(_) => ErrorCategory::Processing,
            DocError::ConfigValidationError { .. }
            | DocError::InvalidConfigValueError { .. }
            | DocError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DocError::DuplicateDocumentError { .. }
            | DocError::RegistryIntegrityError { .. }
            | DocError::DocumentNotFoundError { .. } => ErrorCategory::Registry,
            DocError::AnswerValidationError { .. } => ErrorCategory::Validation,
            DocError::TemplateRenderError { .. } => ErrorCategory::Rendering,
            DocError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路抓取失敗可以重試
            DocError::FetchError(_) => ErrorSeverity::Medium,
            DocError::IoError(_) => ErrorSeverity::Critical,
            DocError::SerializationError(_) => ErrorSeverity::High,
            DocError::ConfigValidationError { .. }
            | DocError::InvalidConfigValueError { .. }
            | DocError::MissingConfigError { .. } => ErrorSeverity::High,
            // 重複註冊必須擋下建置
            DocError::DuplicateDocumentError { .. } => ErrorSeverity::High,
            DocError::RegistryIntegrityError { .. } => ErrorSeverity::High,
            DocError::DocumentNotFoundError { .. } => ErrorSeverity::Medium,
            DocError::AnswerValidationError { .. } => ErrorSeverity::Medium,
            DocError::TemplateRenderError { .. } => ErrorSeverity::Medium,
            DocError::ProcessingError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DocError::FetchError(_) => {
                "Check the template base URL and network connectivity, then retry".to_string()
            }
            DocError::IoError(_) => "Check file permissions and that the paths exist".to_string(),
            DocError::SerializationError(_) => {
                "Regenerate the registry with registry-build; the JSON may be stale or corrupt"
                    .to_string()
            }
            DocError::ConfigValidationError { field, .. }
            | DocError::InvalidConfigValueError { field, .. }
            | DocError::MissingConfigError { field } => {
                format!(
                    "Fix the '{}' setting in the document definition or CLI flags",
                    field
                )
            }
            DocError::DuplicateDocumentError { jurisdiction, id } => format!(
                "Remove or rename one of the '{}' definitions under jurisdiction '{}'",
                id, jurisdiction
            ),
            DocError::RegistryIntegrityError { .. } => {
                "Rebuild the registry from the document source tree with registry-build".to_string()
            }
            DocError::DocumentNotFoundError { id } => {
                format!(
                    "Run registry-build and confirm '{}' exists in the source tree",
                    id
                )
            }
            DocError::AnswerValidationError { field, .. } => {
                format!("Correct the answer for '{}' and try again", field)
            }
            DocError::TemplateRenderError {
                document_id,
                locale,
            } => format!(
                "Confirm the template for '{}' ({}) exists under the template base",
                document_id, locale
            ),
            DocError::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DocError::FetchError(_) => "Could not fetch the document template".to_string(),
            DocError::IoError(_) => "A file could not be read or written".to_string(),
            DocError::SerializationError(_) => "The registry file could not be parsed".to_string(),
            DocError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            DocError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            DocError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            DocError::DuplicateDocumentError { jurisdiction, id } => format!(
                "Two documents share the id '{}' in jurisdiction '{}'",
                id, jurisdiction
            ),
            DocError::RegistryIntegrityError { message } => {
                format!("The registry file is inconsistent: {}", message)
            }
            DocError::DocumentNotFoundError { id } => {
                format!("No document with id '{}' is registered", id)
            }
            DocError::AnswerValidationError { field, message } => {
                format!("Answer for '{}' is invalid: {}", field, message)
            }
            DocError::TemplateRenderError { document_id, .. } => {
                format!("The draft for '{}' could not be rendered", document_id)
            }
            DocError::ProcessingError { message } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_document_is_high_severity() {
        let err = DocError::DuplicateDocumentError {
            jurisdiction: "us".to_string(),
            id: "vehicle-bill-of-sale".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), ErrorCategory::Registry);
        assert!(err.to_string().contains("vehicle-bill-of-sale"));
    }

    #[test]
    fn test_answer_validation_is_recoverable() {
        let err = DocError::AnswerValidationError {
            field: "sale_date".to_string(),
            message: "expected YYYY-MM-DD".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("sale_date"));
    }
}
