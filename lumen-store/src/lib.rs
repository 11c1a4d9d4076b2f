//! lumen-store: file-backed storage for the Lumen engine.
//!
//! A [`MemoryStore`] implements [`lumen_core::LogStore`] over a [`Snapshot`]
//! that is loaded from and saved to a single JSON file. Writes are mirrored
//! into an [`Outbox`] that is flushed when a [`Connectivity`] context says
//! the sync collaborator is reachable.

pub mod connectivity;
pub mod csv_import;
pub mod error;
pub mod memory;
pub mod outbox;
pub mod snapshot;

pub use connectivity::Connectivity;
pub use csv_import::import_habit_logs_csv;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use outbox::{
    FlushReport, Outbox, PendingKey, PendingPayload, PendingWrite, DEFAULT_MAX_RETRIES,
};
pub use snapshot::Snapshot;
