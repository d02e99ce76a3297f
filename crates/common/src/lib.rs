//! Error taxonomy and wire layout shared across `etm-seal` crates.

pub mod error;
pub mod record;

pub use error::EtmError;
pub use record::SealedRecord;
