//! easel-store: encoded bitmap snapshots and their durable storage.
//!
//! Design rules:
//! - Snapshots are opaque PNG blobs; only the codec looks inside.
//! - Storage holds exactly one canvas per key and overwrites it.
//! - A stored canvas that cannot be read back is the same as no stored canvas.

pub mod bridge;
pub mod snapshot;
pub mod storage;

pub use bridge::{PersistedCanvasV1, PersistenceBridge, PERSIST_SCHEMA_VERSION};
pub use snapshot::{CodecError, DecodedImage, Snapshot};
pub use storage::{FileStorage, MemoryStorage, Storage};
