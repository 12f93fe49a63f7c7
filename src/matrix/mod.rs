//! The translation matrix: filtering, selection, and the single-cell
//! and batch edit state machines.

pub mod batch;
pub mod filter;
pub mod merge;
pub mod selection;
pub mod session;
pub mod workbench;

pub use batch::{
    BatchDraft,
    BatchEditController,
    BatchError,
};
pub use filter::{
    FilterState,
    PAGE_SIZE,
    page_count,
};
pub use merge::merge_translation;
pub use selection::Selection;
pub use session::{
    EditDraft,
    EditError,
    EditSessionController,
    SavePayload,
};
pub use workbench::{
    MatrixPage,
    MatrixWorkbench,
    WorkbenchError,
};
