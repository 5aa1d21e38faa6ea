//! Domain error types.

mod probe_error;
mod storage_error;

pub use probe_error::ProbeError;
pub use storage_error::StorageError;
