use crate::config::document::DocumentConfig;
use crate::domain::model::{RegistryEntry, RegistryFile, MANIFEST_VERSION};
use crate::domain::ports::Storage;
use crate::utils::error::{DocError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 建置結果摘要，給 CLI 顯示用
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub documents: usize,
    pub jurisdictions: Vec<String>,
    pub overlay_entries: usize,
}

/// 掃描文件來源樹，收集所有 *.toml 定義檔路徑。
/// 路徑排序後回傳，確保建置結果與掃描順序無關。
pub fn scan_document_tree(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_toml_files(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_toml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).map_err(DocError::IoError)? {
        let entry = entry.map_err(DocError::IoError)?;
        let path = entry.path();
        if path.is_dir() {
            collect_toml_files(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            files.push(path);
        }
    }
    Ok(())
}

/// 一次性的離線建置：載入每個定義檔、驗證、偵測重複註冊，
/// 輸出以 (jurisdiction, id) 排序的靜態註冊表。
/// 重複的 (jurisdiction, id) 是建置管線唯一真正的正確性閘門，直接失敗。
pub fn build_registry(root: &Path) -> Result<RegistryFile> {
    let files = scan_document_tree(root)?;
    tracing::info!("📄 Found {} document definition(s) under {}", files.len(), root.display());

    let mut by_key: BTreeMap<(String, String), RegistryEntry> = BTreeMap::new();
    let mut seen_paths: BTreeMap<(String, String), PathBuf> = BTreeMap::new();

    for path in files {
        tracing::debug!("📄 Loading {}", path.display());
        let config = DocumentConfig::from_file(&path)?;
        config.validate_config().map_err(|e| match e {
            DocError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => DocError::InvalidConfigValueError {
                field: format!("{}: {}", path.display(), field),
                value,
                reason,
            },
            DocError::MissingConfigError { field } => DocError::MissingConfigError {
                field: format!("{}: {}", path.display(), field),
            },
            other => other,
        })?;

        let entry = config.into_entry();
        let key = (entry.jurisdiction.clone(), entry.id.clone());

        if let Some(previous) = seen_paths.get(&key) {
            tracing::error!(
                "❌ Duplicate registration: '{}' defined in both {} and {}",
                entry.id,
                previous.display(),
                path.display()
            );
            return Err(DocError::DuplicateDocumentError {
                jurisdiction: key.0,
                id: key.1,
            });
        }

        seen_paths.insert(key.clone(), path);
        by_key.insert(key, entry);
    }

    Ok(RegistryFile {
        manifest_version: MANIFEST_VERSION.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        documents: by_key.into_values().collect(),
    })
}

pub fn summarize(file: &RegistryFile) -> BuildSummary {
    let mut jurisdictions: Vec<String> = file
        .documents
        .iter()
        .map(|d| d.jurisdiction.clone())
        .collect();
    jurisdictions.sort();
    jurisdictions.dedup();

    BuildSummary {
        documents: file.documents.len(),
        jurisdictions,
        overlay_entries: file.documents.iter().map(|d| d.overlays.len()).sum(),
    }
}

/// 將註冊表寫到輸出位置
pub async fn write_registry<S: Storage>(
    storage: &S,
    path: &str,
    file: &RegistryFile,
) -> Result<()> {
    let json = serde_json::to_string_pretty(file)?;
    storage.write_file(path, json.as_bytes()).await?;
    tracing::info!("💾 Registry written to {}", path);
    Ok(())
}
