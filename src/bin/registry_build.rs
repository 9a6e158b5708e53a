use clap::Parser;
use legaldoc_core::core::manifest::{build_registry, summarize, write_registry};
use legaldoc_core::utils::error::ErrorSeverity;
use legaldoc_core::utils::logger;
use legaldoc_core::LocalStorage;
use std::path::Path;

#[derive(Parser)]
#[command(name = "registry-build")]
#[command(about = "Build the static document registry from the definition source tree")]
struct Args {
    /// Path to the document definition source tree
    #[arg(short, long, default_value = "./documents")]
    source: String,

    /// Where to write the registry JSON
    #[arg(short, long, default_value = "documents/registry.json")]
    output: String,

    /// Validate the source tree without writing the registry
    #[arg(long)]
    check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines (for CI pipelines)
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting registry build");
    tracing::info!("📁 Scanning document definitions under: {}", args.source);

    // 建置是一次性的離線程序；任何完整性問題都要大聲失敗，
    // 不能讓模稜兩可的註冊表出貨
    let file = match build_registry(Path::new(&args.source)) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(
                "❌ Registry build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(if exit_code > 0 { exit_code } else { 1 });
        }
    };

    let summary = summarize(&file);
    println!("📋 Registry Summary:");
    println!("  Documents: {}", summary.documents);
    println!("  Jurisdictions: {}", summary.jurisdictions.join(", "));
    println!("  Overlay entries: {}", summary.overlay_entries);
    println!();

    if args.check {
        tracing::info!("🔍 CHECK MODE - registry not written");
        println!("✅ Source tree is valid. Drop --check to write {}", args.output);
        return Ok(());
    }

    let storage = LocalStorage::new(".".to_string());
    if let Err(e) = write_registry(&storage, &args.output, &file).await {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(3);
    }

    tracing::info!("✅ Registry build completed successfully!");
    println!("✅ Registry build completed successfully!");
    println!("📁 Output saved to: {}", args.output);

    Ok(())
}
