//! ストア永続化のバックエンド

use std::path::PathBuf;

use thiserror::Error;

/// 永続化レイヤーのエラー
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access persisted state: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse persisted state: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 名前付きレコード単位の永続化先
///
/// ストアごとに独立したレコード（`project-storage` など）を読み書きする。
pub trait StateStorage {
    /// レコードを読み込む
    ///
    /// # Returns
    /// - `Ok(Some(json))`: レコードが存在する
    /// - `Ok(None)`: レコードが存在しない
    ///
    /// # Errors
    /// 読み込みエラー
    fn read(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// レコードを書き込む
    ///
    /// # Errors
    /// 書き込みエラー
    fn write(&self, name: &str, json: &str) -> Result<(), StoreError>;
}

/// JSON ファイルによる永続化（レコードごとに `<name>.json`）
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// `dir` 配下にレコードを保存するストレージを作成
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl StateStorage for JsonFileStorage {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.record_path(name);

        if !path.exists() {
            tracing::debug!("Persisted record not found: {:?}", path);
            return Ok(None);
        }

        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn write(&self, name: &str, json: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.record_path(name), json)?;
        tracing::debug!("Persisted record written: {}", name);
        Ok(())
    }
}
