//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
};

use chrono::{
    DateTime,
    TimeZone,
    Utc,
};

use crate::model::{
    EntryChange,
    EntryId,
    LocalizationEntry,
    NewEntry,
    TranslationMap,
    TranslationValue,
};
use crate::store::persist::{
    StateStorage,
    StoreError,
};
use crate::sync::{
    SyncClient,
    SyncError,
};

/// テスト用の固定タイムスタンプ
pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// テスト用の翻訳マップを作成する
pub(crate) fn translations(pairs: &[(&str, &str)]) -> TranslationMap {
    pairs
        .iter()
        .map(|(language, value)| {
            (
                (*language).to_string(),
                TranslationValue {
                    value: (*value).to_string(),
                    updated_at: fixed_now(),
                    updated_by: "fixture".to_string(),
                },
            )
        })
        .collect()
}

/// テスト用のエントリを作成する
pub(crate) fn entry(
    id: EntryId,
    key: &str,
    category: &str,
    pairs: &[(&str, &str)],
) -> LocalizationEntry {
    LocalizationEntry {
        id,
        key: key.to_string(),
        category: category.to_string(),
        description: None,
        translations: translations(pairs),
        project_id: "proj-1".to_string(),
    }
}

/// 説明付きのテスト用エントリを作成する
pub(crate) fn described_entry(
    id: EntryId,
    key: &str,
    category: &str,
    description: &str,
    pairs: &[(&str, &str)],
) -> LocalizationEntry {
    LocalizationEntry {
        description: Some(description.to_string()),
        ..entry(id, key, category, pairs)
    }
}

/// メモリ上の `StateStorage` 実装
///
/// `clone` したインスタンスは同じレコードを共有するため、
/// 再読み込みのテストに使える。
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl StateStorage for MemoryStorage {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.lock().unwrap().get(name).cloned())
    }

    fn write(&self, name: &str, json: &str) -> Result<(), StoreError> {
        self.records.lock().unwrap().insert(name.to_string(), json.to_string());
        Ok(())
    }
}

/// スクリプト化したレスポンスを返す `SyncClient` の偽実装
///
/// `entries` が fetch の応答になる。成功した変更は `entries` に反映
/// されるため、refresh 後の状態をそのまま検証できる。
#[derive(Debug, Default)]
pub(crate) struct FakeSyncClient {
    pub entries: Mutex<Vec<LocalizationEntry>>,
    pub fail_fetch: Mutex<bool>,
    pub fail_update: Mutex<bool>,
    pub fail_batch: Mutex<bool>,
    /// 記録された単一更新（entry_id とマップ）
    pub updates: Mutex<Vec<(EntryId, TranslationMap)>>,
    /// 記録されたバッチ更新
    pub batches: Mutex<Vec<Vec<EntryChange>>>,
}

impl FakeSyncClient {
    pub(crate) fn with_entries(entries: Vec<LocalizationEntry>) -> Self {
        Self { entries: Mutex::new(entries), ..Self::default() }
    }
}

impl SyncClient for FakeSyncClient {
    async fn fetch_entries(&self, _project_id: &str) -> Result<Vec<LocalizationEntry>, SyncError> {
        if *self.fail_fetch.lock().unwrap() {
            return Err(SyncError::transport("fetch failed"));
        }
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn create_entry(
        &self,
        project_id: &str,
        entry: NewEntry,
    ) -> Result<LocalizationEntry, SyncError> {
        let mut entries = self.entries.lock().unwrap();
        let id = entries.iter().map(|existing| existing.id).max().unwrap_or(0) + 1;
        let created = LocalizationEntry {
            id,
            key: entry.key,
            category: entry.category,
            description: entry.description,
            translations: entry
                .translations
                .into_iter()
                .map(|(language, translation)| {
                    (
                        language,
                        TranslationValue {
                            value: translation.value,
                            updated_at: fixed_now(),
                            updated_by: "fixture".to_string(),
                        },
                    )
                })
                .collect(),
            project_id: project_id.to_string(),
        };
        entries.push(created.clone());
        Ok(created)
    }

    async fn update_entry(
        &self,
        _project_id: &str,
        entry_id: EntryId,
        translations: TranslationMap,
    ) -> Result<LocalizationEntry, SyncError> {
        if *self.fail_update.lock().unwrap() {
            return Err(SyncError::transport("update failed"));
        }
        self.updates.lock().unwrap().push((entry_id, translations.clone()));

        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|existing| existing.id == entry_id)
            .ok_or_else(|| SyncError::transport("entry not found"))?;
        entry.translations = translations;
        Ok(entry.clone())
    }

    async fn update_entries_batch(
        &self,
        _project_id: &str,
        changes: Vec<EntryChange>,
    ) -> Result<(), SyncError> {
        if *self.fail_batch.lock().unwrap() {
            return Err(SyncError::transport("batch failed"));
        }
        self.batches.lock().unwrap().push(changes.clone());

        let mut entries = self.entries.lock().unwrap();
        for change in changes {
            if let Some(entry) = entries.iter_mut().find(|existing| existing.id == change.id) {
                entry.translations = change.translations;
            }
        }
        Ok(())
    }
}
