use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// 以資料目錄為根的本機檔案存取，每次請求開檔、讀完即關閉
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
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ForecastError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("corn.csv"), "Date,A\n").unwrap();

        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
        let data = storage.read_file("corn.csv").await.unwrap();
        assert_eq!(data, b"Date,A\n");
    }

    #[tokio::test]
    async fn test_missing_file_keeps_not_found_kind() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

        match storage.read_file("missing.csv").await {
            Err(ForecastError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected result: {:?}", other.map(|d| d.len())),
        }
    }
}
