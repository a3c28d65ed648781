pub mod applier;
pub mod inspect;
pub mod store;
pub mod types;
pub mod writer;

pub use applier::SnapshotApplier;
pub use inspect::{FileSummary, inspect};
pub use store::{SnapshotEntry, SnapshotStore};
pub use types::{BASELINE, Outcome, SnapshotMeta, SnapshotName};
pub use writer::SnapshotWriter;
