//! Provider existence check adapters.

mod http_existence_check;

pub use http_existence_check::{HttpCheckConfig, HttpExistenceCheck};
