//! Outbound persistence: the client contract, its error taxonomy, and
//! the fetch cache the core maintains over it.

pub mod cache;
pub mod client;
pub mod error;

pub use cache::{
    LoadState,
    ResourceCache,
};
pub use client::SyncClient;
pub use error::SyncError;
