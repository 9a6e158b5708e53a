use crate::domain::model::{AnswerSet, DocumentForm, FieldConstraint, FieldType};
use crate::utils::error::{DocError, Result};
use chrono::NaiveDate;

/// 在產生文件前驗證回答集。
/// 回傳第一個不合法的欄位；「文件不存在」由 registry 的 None 表達，
/// 與這裡的驗證失敗是兩回事。
pub fn validate_answers(form: &DocumentForm, answers: &AnswerSet) -> Result<()> {
    for (field, constraint) in &form.schema {
        match answers.get(field.as_str()) {
            value if is_blank(value) => {
                if constraint.required {
                    return Err(DocError::AnswerValidationError {
                        field: field.clone(),
                        message: "required answer is missing or blank".to_string(),
                    });
                }
            }
            Some(value) => check_type(field, constraint, value)?,
            None => {}
        }
    }

    // 不在 schema 裡的回答 key 直接忽略
    Ok(())
}

fn check_type(field: &str, constraint: &FieldConstraint, value: &serde_json::Value) -> Result<()> {
    match constraint.field_type {
        FieldType::Text => {
            if !value.is_string() {
                return Err(invalid(field, "expected a text value"));
            }
        }
        FieldType::Number => {
            // 接受 JSON 數字或可解析的數字字串
            let ok = match value {
                serde_json::Value::Number(_) => true,
                serde_json::Value::String(s) => s.trim().parse::<f64>().is_ok(),
                _ => false,
            };
            if !ok {
                return Err(invalid(field, "expected a number"));
            }
        }
        FieldType::Date => {
            let ok = value
                .as_str()
                .map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok())
                .unwrap_or(false);
            if !ok {
                return Err(invalid(field, "expected a date in YYYY-MM-DD format"));
            }
        }
        FieldType::Boolean => {
            let ok = match value {
                serde_json::Value::Bool(_) => true,
                serde_json::Value::String(s) => {
                    matches!(s.trim().to_lowercase().as_str(), "true" | "false")
                }
                _ => false,
            };
            if !ok {
                return Err(invalid(field, "expected true or false"));
            }
        }
        FieldType::Select => {
            let chosen = value
                .as_str()
                .ok_or_else(|| invalid(field, "expected one of the declared options"))?;
            if let Some(options) = &constraint.options {
                if !options.iter().any(|o| o == chosen) {
                    return Err(DocError::AnswerValidationError {
                        field: field.to_string(),
                        message: format!(
                            "'{}' is not one of the declared options: {}",
                            chosen,
                            options.join(", ")
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> DocError {
    DocError::AnswerValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// 缺席、null、或修剪後為空字串都視為空白
pub fn is_blank(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
