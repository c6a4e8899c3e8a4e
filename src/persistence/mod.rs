pub mod files;
pub mod snapshot;
pub mod store;

pub use files::{
    atomic_write, backup_file, ensure_dir, get_data_dir, init_local_data_dir, read_file,
};
pub use snapshot::{PartialUserStats, Snapshot};
pub use store::{FileStore, MemoryStore, StateStore, StoreError, STATE_KEY};
