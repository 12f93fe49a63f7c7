//! i18n-catalog-editor
//!
//! ローカライズカタログの編集コア：翻訳マトリクス（フィルタ・検索・
//! ページング・選択）と、単一セル編集およびバッチ編集のステートマシン
//!
//! 描画技術には依存せず、任意のフロントエンドから同期的に呼び出せる。

pub mod matrix;
pub mod model;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_utils;

// ワークベンチを再エクスポート
pub use matrix::workbench::MatrixWorkbench;
