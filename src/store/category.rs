//! カテゴリ選択の永続ストア

use std::collections::HashSet;

use serde::{
    Deserialize,
    Serialize,
};

use crate::model::LocalizationEntry;

use super::persist::{
    StateStorage,
    StoreError,
};

/// 全エントリにマッチする合成カテゴリ
pub const ALL_CATEGORY: &str = "all";

/// 永続化レコード名
const RECORD: &str = "category-storage";

/// 永続化されるレコード
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CategoryRecord {
    active_category: String,
    categories: Vec<String>,
}

impl Default for CategoryRecord {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORY.to_string(),
            categories: vec![ALL_CATEGORY.to_string()],
        }
    }
}

/// アクティブなカテゴリと既知カテゴリ一覧を保持する
///
/// カテゴリはエントリから導出される値で、一覧は常に `"all"` を先頭に
/// 持つ。再計算してもアクティブなカテゴリは変更しない（一覧から一時的に
/// 消えていても保持する）。
#[derive(Debug)]
pub struct CategoryStore<S> {
    storage: S,
    record: CategoryRecord,
}

impl<S: StateStorage> CategoryStore<S> {
    /// ストレージから状態を復元してストアを作成
    ///
    /// # Errors
    /// 読み込みまたはパースエラー
    pub fn load(storage: S) -> Result<Self, StoreError> {
        let record = match storage.read(RECORD)? {
            Some(json) => serde_json::from_str(&json)?,
            None => CategoryRecord::default(),
        };
        Ok(Self { storage, record })
    }

    /// アクティブなカテゴリ
    #[must_use]
    pub fn active(&self) -> &str {
        &self.record.active_category
    }

    /// 既知カテゴリ一覧（先頭は常に `"all"`）
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.record.categories
    }

    /// アクティブなカテゴリを設定する
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn set_active(&mut self, category: impl Into<String>) -> Result<(), StoreError> {
        self.record.active_category = category.into();
        self.persist()
    }

    /// 既知カテゴリ一覧を置き換える
    ///
    /// `"all"` を除いた上で先頭に付け直す。アクティブなカテゴリは
    /// 変更しない。
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn set_categories(&mut self, categories: Vec<String>) -> Result<(), StoreError> {
        let mut next = vec![ALL_CATEGORY.to_string()];
        next.extend(categories.into_iter().filter(|category| category != ALL_CATEGORY));
        self.record.categories = next;
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.record)?;
        self.storage.write(RECORD, &json)
    }
}

/// エントリ一覧からカテゴリ候補を導出する（初出順、重複なし）
#[must_use]
pub fn distinct_categories(entries: &[LocalizationEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();
    for entry in entries {
        if seen.insert(entry.category.as_str()) {
            categories.push(entry.category.clone());
        }
    }
    categories
}
