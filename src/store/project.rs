//! プロジェクト選択の永続ストア

use serde::{
    Deserialize,
    Serialize,
};

use crate::model::Project;

use super::persist::{
    StateStorage,
    StoreError,
};

/// 永続化レコード名
const RECORD: &str = "project-storage";

/// 永続化されるレコード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProjectRecord {
    active_project: Option<Project>,
    projects: Vec<Project>,
}

/// アクティブなプロジェクトと既知プロジェクト一覧を保持する
///
/// 起動時に [`ProjectStore::load`] で復元し、変更のたびに書き戻す。
#[derive(Debug)]
pub struct ProjectStore<S> {
    storage: S,
    record: ProjectRecord,
}

impl<S: StateStorage> ProjectStore<S> {
    /// ストレージから状態を復元してストアを作成
    ///
    /// # Errors
    /// 読み込みまたはパースエラー
    pub fn load(storage: S) -> Result<Self, StoreError> {
        let record = match storage.read(RECORD)? {
            Some(json) => serde_json::from_str(&json)?,
            None => ProjectRecord::default(),
        };
        Ok(Self { storage, record })
    }

    /// アクティブなプロジェクト
    #[must_use]
    pub fn active(&self) -> Option<&Project> {
        self.record.active_project.as_ref()
    }

    /// 既知プロジェクト一覧
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.record.projects
    }

    /// アクティブなプロジェクトを設定する
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn set_active(&mut self, project: Project) -> Result<(), StoreError> {
        self.record.active_project = Some(project);
        self.persist()
    }

    /// 既知プロジェクト一覧を置き換える
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn set_projects(&mut self, projects: Vec<Project>) -> Result<(), StoreError> {
        self.record.projects = projects;
        self.persist()
    }

    /// 既知一覧へ追加する
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn add_project(&mut self, project: Project) -> Result<(), StoreError> {
        self.record.projects.push(project);
        self.persist()
    }

    /// 同じ id のプロジェクトを置き換える
    ///
    /// # Errors
    /// 書き込みエラー
    pub fn update_project(&mut self, project: Project) -> Result<(), StoreError> {
        for existing in &mut self.record.projects {
            if existing.id == project.id {
                existing.clone_from(&project);
            }
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.record)?;
        self.storage.write(RECORD, &json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::MemoryStorage;

    fn project(id: &str, name: &str) -> Project {
        Project { id: id.to_string(), name: name.to_string() }
    }

    /// `load`: レコードが無い場合は空の状態
    #[rstest]
    fn load_without_record_is_empty() {
        let store = ProjectStore::load(MemoryStorage::default()).unwrap();

        assert!(store.active().is_none());
        assert!(store.projects().is_empty());
    }

    /// 変更が書き戻され、`load` で復元できる
    #[rstest]
    fn mutations_write_through_and_reload() {
        let storage = MemoryStorage::default();
        {
            let mut store = ProjectStore::load(storage.clone()).unwrap();
            store.add_project(project("p1", "Website")).unwrap();
            store.set_active(project("p1", "Website")).unwrap();
        }

        let reloaded = ProjectStore::load(storage).unwrap();

        assert_eq!(reloaded.active().map(|p| p.id.as_str()), Some("p1"));
        assert_eq!(reloaded.projects().len(), 1);
    }

    /// `update_project`: 同じ id のみ置き換える
    #[rstest]
    fn update_project_replaces_matching_id() {
        let mut store = ProjectStore::load(MemoryStorage::default()).unwrap();
        store.set_projects(vec![project("p1", "Website"), project("p2", "Mobile")]).unwrap();

        store.update_project(project("p1", "Website v2")).unwrap();

        assert_eq!(store.projects().first().map(|p| p.name.as_str()), Some("Website v2"));
        assert_eq!(store.projects().get(1).map(|p| p.name.as_str()), Some("Mobile"));
    }
}
