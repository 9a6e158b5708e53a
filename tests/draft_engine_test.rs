use anyhow::Result;
use legaldoc_core::core::manifest::build_registry;
use legaldoc_core::domain::model::AnswerSet;
use legaldoc_core::{DirTemplateSource, DocError, DocumentRegistry, DraftEngine};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

fn shipped_registry() -> Arc<DocumentRegistry> {
    let file = build_registry(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/documents"
    )))
    .unwrap();
    Arc::new(DocumentRegistry::from_entries(file.documents).unwrap())
}

fn shipped_engine() -> DraftEngine<DirTemplateSource> {
    DraftEngine::new(
        shipped_registry(),
        DirTemplateSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")),
    )
}

fn answers(pairs: &[(&str, serde_json::Value)]) -> AnswerSet {
    let mut map = HashMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v.clone());
    }
    map
}

fn affidavit_answers() -> AnswerSet {
    answers(&[
        ("affiant_name", serde_json::json!("Maria Garcia")),
        ("affiant_address", serde_json::json!("10 Main St, Austin, TX")),
        ("county", serde_json::json!("Travis")),
        ("state_name", serde_json::json!("Texas")),
        (
            "statement",
            serde_json::json!("I have resided at the above address since 2019."),
        ),
        ("execution_date", serde_json::json!("2025-06-01")),
    ])
}

/// 對著出貨的 documents/ 與 templates/ 跑完整流程
#[tokio::test]
async fn test_end_to_end_affidavit_draft() -> Result<()> {
    let engine = shipped_engine();

    let draft = engine
        .generate("affidavit-general", "Texas", "en", &affidavit_answers())
        .await?;

    // 已知值加粗出現在草稿裡
    assert!(draft.text.contains("**Maria Garcia**"));
    assert!(draft.text.contains("**Travis**"));
    assert!(draft.text.contains("**2025-06-01**"));
    // 渲染後不能殘留任何原始 token
    assert!(!draft.text.contains("{{"));

    let compliance = draft.compliance.unwrap();
    assert!(compliance.requires_notary);
    assert_eq!(compliance.state, "TX");

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_spanish_draft() -> Result<()> {
    let engine = shipped_engine();

    let draft = engine
        .generate("affidavit-general", "FL", "es", &affidavit_answers())
        .await?;

    // 西語模板存在，直接使用而不是退回英語
    assert!(draft.text.contains("Declaración Jurada General"));
    assert!(draft.text.contains("**Maria Garcia**"));
    assert!(!draft.text.contains("{{"));

    Ok(())
}

#[tokio::test]
async fn test_missing_optional_answers_become_blanks() -> Result<()> {
    let engine = shipped_engine();

    let draft = engine
        .generate(
            "residential-lease-agreement",
            "FL",
            "en",
            &answers(&[
                ("landlord_name", serde_json::json!("Acme Properties LLC")),
                ("tenant_name", serde_json::json!("John Roe")),
                (
                    "property_address",
                    serde_json::json!("500 Collins Ave, Miami Beach, FL"),
                ),
                ("lease_start_date", serde_json::json!("2025-09-01")),
                ("lease_end_date", serde_json::json!("2026-08-31")),
                ("monthly_rent", serde_json::json!(2400)),
                ("security_deposit", serde_json::json!(2400)),
                // late_fee 未回答
            ]),
        )
        .await?;

    // 選填欄位缺漏 → 空白標記
    assert!(draft.text.contains("A late fee of $ ____ applies"));
    assert!(draft.text.contains("**Acme Properties LLC**"));

    // 佛州租約要兩名見證人
    assert_eq!(draft.compliance.unwrap().witness_count, 2);

    Ok(())
}

#[tokio::test]
async fn test_unknown_document_is_not_found() {
    let engine = shipped_engine();

    let result = engine
        .generate("last-will-and-testament", "FL", "en", &HashMap::new())
        .await;

    assert!(matches!(
        result,
        Err(DocError::DocumentNotFoundError { id }) if id == "last-will-and-testament"
    ));
}

#[tokio::test]
async fn test_invalid_answers_are_distinct_from_not_found() {
    let engine = shipped_engine();

    // 文件存在，但缺必填回答
    let result = engine
        .generate("affidavit-general", "FL", "en", &HashMap::new())
        .await;

    assert!(matches!(
        result,
        Err(DocError::AnswerValidationError { .. })
    ));
}

#[tokio::test]
async fn test_bad_date_answer_is_rejected() {
    let engine = shipped_engine();

    let mut bad_answers = affidavit_answers();
    bad_answers.insert(
        "execution_date".to_string(),
        serde_json::json!("June 1st, 2025"),
    );

    let result = engine
        .generate("affidavit-general", "FL", "en", &bad_answers)
        .await;

    assert!(matches!(
        result,
        Err(DocError::AnswerValidationError { field, .. }) if field == "execution_date"
    ));
}
