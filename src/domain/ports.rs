use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 依相對路徑（例如 "en/vehicle-bill-of-sale.md"）取得原始模板內容
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String>;
}
