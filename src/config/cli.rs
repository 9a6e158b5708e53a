use crate::domain::ports::{Storage, TemplateSource};
use crate::utils::error::{DocError, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// 從本地目錄讀模板，路徑慣例 {base}/{locale}/{docId}.md
#[derive(Debug, Clone)]
pub struct DirTemplateSource {
    base_dir: PathBuf,
}

impl DirTemplateSource {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

#[async_trait]
impl TemplateSource for DirTemplateSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let full_path = self.base_dir.join(path);
        let content = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(DocError::IoError)?;
        Ok(content)
    }
}

/// 從 HTTP 端點抓模板，GET {base_url}/{path}
#[derive(Debug, Clone)]
pub struct HttpTemplateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        tracing::debug!("📡 Fetching template: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DocError::ProcessingError {
                message: format!(
                    "Template request failed with status {}: {}",
                    response.status(),
                    url
                ),
            });
        }

        Ok(response.text().await?)
    }
}
