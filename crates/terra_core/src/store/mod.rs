//! Local catalog store.

mod local;
mod row;
mod snapshot;

pub use local::LocalStore;
pub use row::StoredRow;
pub use snapshot::Snapshot;
