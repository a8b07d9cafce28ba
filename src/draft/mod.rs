//! In-progress form drafts
//! Snapshot type, debounce timer, age formatting and the Draft Store itself

pub mod age;
pub mod snapshot;
pub mod store;
pub mod timer;

pub use age::DraftAge;
pub use snapshot::{FieldError, FormField, FormSnapshot};
pub use store::{DraftStatus, DraftStore, SaveOutcome};
pub use timer::DebounceTimer;
