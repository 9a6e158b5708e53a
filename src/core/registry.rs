use crate::domain::model::{DocumentForm, RegistryEntry, RegistryFile};
use crate::utils::error::{DocError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// 執行期的文件註冊表。registry-build 產出的 JSON 在程序啟動時載入一次，
/// 之後為唯讀；表單快取是唯一的共享可變狀態（每個 key 只寫一次）。
pub struct DocumentRegistry {
    entries: BTreeMap<String, RegistryEntry>,
    form_cache: RwLock<HashMap<String, Arc<DocumentForm>>>,
}

impl DocumentRegistry {
    /// 載入並檢查註冊表項目；任何不一致都直接拒絕整份註冊表
    pub fn from_entries(documents: Vec<RegistryEntry>) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for entry in documents {
            if entry.id.trim().is_empty() {
                return Err(DocError::RegistryIntegrityError {
                    message: "entry with empty id".to_string(),
                });
            }
            // 防線之二：builder 已保證，載入時再查一次
            if entry.id != entry.meta.id {
                return Err(DocError::RegistryIntegrityError {
                    message: format!(
                        "entry '{}' is filed under key '{}' (id/meta.id mismatch)",
                        entry.meta.id, entry.id
                    ),
                });
            }
            if entries.contains_key(&entry.id) {
                return Err(DocError::RegistryIntegrityError {
                    message: format!("duplicate document id '{}'", entry.id),
                });
            }
            entries.insert(entry.id.clone(), entry);
        }

        Ok(Self {
            entries,
            form_cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(content)?;
        tracing::debug!(
            "Loaded registry manifest v{} generated at {}",
            file.manifest_version,
            file.generated_at
        );
        Self::from_entries(file.documents)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DocError::IoError)?;
        Self::from_json(&content)
    }

    /// 未知 id 回傳 None，不拋錯
    pub fn get(&self, document_id: &str) -> Option<&RegistryEntry> {
        self.entries.get(document_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 取得文件的 schema 與問題序列，依 id 記憶化。
    /// 同一 key 的併發填入會得到同一個 Arc，快取永不失效。
    pub fn form(&self, document_id: &str) -> Option<Arc<DocumentForm>> {
        if let Some(cached) = self
            .form_cache
            .read()
            .ok()
            .and_then(|cache| cache.get(document_id).cloned())
        {
            return Some(cached);
        }

        let entry = self.entries.get(document_id)?;
        let form = Arc::new(DocumentForm {
            schema: entry.meta.schema.clone(),
            questions: entry.meta.questions.clone(),
        });

        let mut cache = match self.form_cache.write() {
            Ok(cache) => cache,
            // 毒化的鎖只影響快取，直接回傳新建的值
            Err(poisoned) => poisoned.into_inner(),
        };
        Some(
            cache
                .entry(document_id.to_string())
                .or_insert(form)
                .clone(),
        )
    }
}
