use clap::Parser;
use legaldoc_core::core::jurisdiction::normalize_jurisdiction;
use legaldoc_core::core::overlay::resolve_overlay;
use legaldoc_core::domain::model::AnswerSet;
use legaldoc_core::domain::ports::{Storage, TemplateSource};
use legaldoc_core::utils::error::ErrorSeverity;
use legaldoc_core::utils::{logger, validation::Validate};
use legaldoc_core::{
    CliConfig, DirTemplateSource, DocError, DocumentDraft, DocumentRegistry, DraftEngine,
    HttpTemplateSource, LocalStorage,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting legaldoc-core CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入註冊表（registry-build 的產物）
    let registry = match DocumentRegistry::from_file(&config.registry) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            tracing::error!("❌ Failed to load registry '{}': {}", config.registry, e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    tracing::info!("📚 Registry loaded: {} document(s)", registry.len());

    // 載入回答集
    let answers = match load_answers(config.answers.as_deref()) {
        Ok(answers) => answers,
        Err(e) => {
            eprintln!("❌ Failed to load answers: {}", e);
            eprintln!("💡 The answers file must be a JSON object keyed by question id");
            std::process::exit(1);
        }
    };

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No draft will be rendered");
        perform_dry_run(&registry, &config);
        return Ok(());
    }

    // 模板來源可以是 HTTP 端點或本地目錄
    let result = if config.templates_is_http() {
        let source = HttpTemplateSource::new(config.templates.clone());
        generate(&registry, source, &config, &answers).await
    } else {
        let source = DirTemplateSource::new(config.templates.clone());
        generate(&registry, source, &config, &answers).await
    };

    match result {
        Ok(draft) => {
            print_compliance_summary(&draft);

            match &config.output {
                Some(path) => {
                    let storage = LocalStorage::new(".".to_string());
                    storage.write_file(path, draft.text.as_bytes()).await?;
                    tracing::info!("✅ Draft generated successfully!");
                    println!("✅ Draft generated successfully!");
                    println!("📁 Output saved to: {}", path);
                }
                None => {
                    println!("{}", draft.text);
                }
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Draft generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn generate<T: TemplateSource>(
    registry: &Arc<DocumentRegistry>,
    source: T,
    config: &CliConfig,
    answers: &AnswerSet,
) -> Result<DocumentDraft, DocError> {
    let engine = DraftEngine::new(registry.clone(), source);
    engine
        .generate(&config.document, &config.state, &config.locale, answers)
        .await
}

fn load_answers(path: Option<&str>) -> Result<AnswerSet, DocError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(DocError::IoError)?;
            let answers: AnswerSet = serde_json::from_str(&content)?;
            Ok(answers)
        }
        None => Ok(AnswerSet::new()),
    }
}

fn print_compliance_summary(draft: &DocumentDraft) {
    if let Some(compliance) = &draft.compliance {
        eprintln!(
            "⚖️ {} / {}: notarization {}, {} witness(es)",
            compliance.document_id,
            compliance.state,
            if compliance.requires_notary {
                "required"
            } else {
                "not required"
            },
            compliance.witness_count
        );
        if let Some(form) = &compliance.official_form {
            eprintln!("⚖️ Official form available: {}", form);
        }
    } else {
        eprintln!(
            "⚖️ No state compliance overlay for '{}' in '{}'",
            draft.document_id, draft.state
        );
    }
}

fn perform_dry_run(registry: &Arc<DocumentRegistry>, config: &CliConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    let entry = match registry.get(&config.document) {
        Some(entry) => entry,
        None => {
            println!("❌ Document '{}' is not registered", config.document);
            std::process::exit(2);
        }
    };

    println!("📋 Document:");
    println!(
        "  Name: {}",
        entry.meta.display_name(&config.locale).unwrap_or(&entry.id)
    );
    println!("  Category: {}", entry.meta.category);
    println!("  Base price: {}", entry.meta.base_price);
    println!("  Locales: {}", entry.meta.language_support.join(", "));
    let code = normalize_jurisdiction(&config.state);
    println!(
        "  Offered in {}: {}",
        code,
        if entry.meta.states.includes(&code) {
            "yes"
        } else {
            "no"
        }
    );

    println!();
    println!("⚖️ Compliance for '{}':", config.state);
    match resolve_overlay(registry, &config.document, &config.state) {
        Some(compliance) => {
            println!(
                "  Notarization: {}",
                if compliance.requires_notary {
                    "required"
                } else {
                    "not required"
                }
            );
            println!("  Witnesses: {}", compliance.witness_count);
            if let Some(form) = &compliance.official_form {
                println!("  Official form: {}", form);
            }
            if let Some(version) = &compliance.schema_version {
                println!("  Schema version: {}", version);
            }
        }
        None => println!("  No overlay entry (base definition applies)"),
    }

    println!();
    println!("📝 Questions ({}):", entry.meta.questions.len());
    for (index, question) in entry.meta.questions.iter().enumerate() {
        println!(
            "  {}. {} ({:?}{})",
            index + 1,
            question.id,
            question.input_type,
            if question.required { ", required" } else { "" }
        );
    }

    println!();
    println!("✅ Dry run analysis complete. Drop --dry-run to render the draft.");
}
