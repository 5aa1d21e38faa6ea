mod clock_port;
mod existence_check_port;
mod key_value_store_port;

pub use clock_port::ClockPort;
pub use existence_check_port::ExistenceCheckPort;
pub use key_value_store_port::KeyValueStorePort;

#[cfg(test)]
pub mod mocks {
    pub use super::clock_port::mock::FixedClock;
    pub use super::existence_check_port::mock::{MockOutcome, RecordingExistenceCheck};
    pub use super::key_value_store_port::MockKeyValueStorePort;
}
