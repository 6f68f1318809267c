//! This is a library that manages a flat-file collection of named map
//! locations: one CSV file holds every saved pin, and the file itself is the
//! only source of truth between requests.

pub mod error;
pub mod record;
pub mod store;

pub use error::Error;
pub use error::Result;
pub use record::LocationRecord;
pub use store::RecordStore;
