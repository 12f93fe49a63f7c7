//! 永続化される選択状態のストア群
//!
//! プロジェクト・言語・カテゴリの各ストアは独立した名前付きレコードとして
//! 永続化され、起動時に `load` で復元し、変更のたびに書き戻す。

pub mod category;
pub mod language;
pub mod persist;
pub mod project;

pub use category::{
    ALL_CATEGORY,
    CategoryStore,
    distinct_categories,
};
pub use language::LanguageStore;
pub use persist::{
    JsonFileStorage,
    StateStorage,
    StoreError,
};
pub use project::ProjectStore;
