use crate::core::loader::is_blank;
use crate::domain::model::{AnswerSet, RegistryEntry};
use crate::domain::ports::TemplateSource;
use regex::Regex;
use std::collections::BTreeSet;

/// 缺漏值的固定空白標記
pub const BLANK_MARKER: &str = "____";

const FALLBACK_LOCALE: &str = "en";

pub struct TemplateRenderer<T: TemplateSource> {
    source: T,
}

impl<T: TemplateSource> TemplateRenderer<T> {
    pub fn new(source: T) -> Self {
        Self { source }
    }

    /// 渲染 (locale, document) 的草稿。
    /// 模板抓取失敗一律回傳空字串並記 warning，不往外拋；
    /// 呼叫端必須把空輸出當成「渲染失敗」。
    pub async fn render(&self, entry: &RegistryEntry, locale: &str, answers: &AnswerSet) -> String {
        let mut candidates: Vec<&str> = Vec::new();

        if let Some(path) = entry.meta.template_paths.get(locale) {
            candidates.push(path);
        }
        // 要求的語系沒有模板（或抓取失敗）時退回 en
        if locale != FALLBACK_LOCALE {
            if let Some(path) = entry.meta.template_paths.get(FALLBACK_LOCALE) {
                if !candidates.contains(&path.as_str()) {
                    candidates.push(path);
                }
            }
        }

        for path in candidates {
            match self.source.fetch(path).await {
                Ok(raw) => return substitute(&raw, answers),
                Err(e) => {
                    tracing::warn!(
                        "Template fetch failed for '{}' at '{}': {}",
                        entry.id,
                        path,
                        e
                    );
                }
            }
        }

        tracing::warn!(
            "No template available for '{}' in locale '{}', returning empty draft",
            entry.id,
            locale
        );
        String::new()
    }
}

/// 將回答代入模板。
/// 已知且非空白的值以粗體包裹（值原樣保留，不改大小寫、不截斷）；
/// 缺漏值以 ____ 取代；最後清掃所有殘留的 {{...}}，輸出不會留下原始 token。
pub fn substitute(template: &str, answers: &AnswerSet) -> String {
    let token_re = Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").unwrap();

    let replaced = token_re.replace_all(template, |caps: &regex::Captures| {
        let key = &caps[1];
        match answers.get(key) {
            value if is_blank(value) => BLANK_MARKER.to_string(),
            Some(value) => format!("**{}**", value_to_string(value)),
            None => BLANK_MARKER.to_string(),
        }
    });

    // 清掃：沒對上 key 規則的 token 也不能留在輸出裡
    let sweep_re = Regex::new(r"\{\{[^{}]*\}\}").unwrap();
    sweep_re.replace_all(&replaced, BLANK_MARKER).to_string()
}

/// 模板中出現的 placeholder key 集合，供雙語 parity 檢查使用
pub fn extract_placeholders(template: &str) -> BTreeSet<String> {
    let token_re = Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").unwrap();
    token_re
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// 自然字串化；這一層不做語系化的數字或日期格式
fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other)
            .unwrap_or_default()
            .trim_matches('"')
            .to_string(),
    }
}
