//! 言語選択の永続ストア

use serde::{
    Deserialize,
    Serialize,
};

use crate::model::Language;

use super::persist::{
    StateStorage,
    StoreError,
};

/// 永続化レコード名
const RECORD: &str = "language-storage";

/// 永続化されるレコード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LanguageRecord {
    active_language: Option<Language>,
    languages: Vec<Language>,
}

/// アクティブな言語（編集対象の列）と既知言語一覧を保持する
///
/// 起動時に [`LanguageStore::load`] で復元し、変更のたびに書き戻す。
#[derive(Debug)]
pub struct LanguageStore<S> {
    storage: S,
    record: LanguageRecord,
}

impl<S: StateStorage> LanguageStore<S> {
    /// ストレージから状態を復元してストアを作成
    ///
    /// # Errors
    /// 読み込みまたはパースエラー
    pub fn load(storage: S) -> Result<Self, StoreError> {
        let record = match storage.read(RECORD)? {
            Some(json) => serde_json::from_str(&json)?,
            None => LanguageRecord::default(),
        };
        Ok(Self { storage, record })
    }

    /// アクティブな言語
    #[must_use]
    pub fn active(&self) -> Option<&Language> {
        self.record.active_language.as_ref()
    }

    /// 既知言語一覧
    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.record.languages
    }

    /// アクティブな言語を設定する
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn set_active(&mut self, language: Language) -> Result<(), StoreError> {
        self.record.active_language = Some(language);
        self.persist()
    }

    /// 既知言語一覧を置き換える
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn set_languages(&mut self, languages: Vec<Language>) -> Result<(), StoreError> {
        self.record.languages = languages;
        self.persist()
    }

    /// 既知一覧へ追加する
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn add_language(&mut self, language: Language) -> Result<(), StoreError> {
        self.record.languages.push(language);
        self.persist()
    }

    /// 同じコードの言語を置き換える
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn update_language(&mut self, language: Language) -> Result<(), StoreError> {
        for existing in &mut self.record.languages {
            if existing.code == language.code {
                existing.clone_from(&language);
            }
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.record)?;
        self.storage.write(RECORD, &json)
    }
}
