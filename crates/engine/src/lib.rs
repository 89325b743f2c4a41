//! `timberline-engine`: timber log-shipment analytics.
//!
//! Pure engine crate: receives a loaded record set, returns derived views
//! (filtered records, species volumes, camp balance, aging, routes).
//! The CSV loader in [`load`] is the only text-facing module.

pub mod aggregate;
pub mod aging;
pub mod camp;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod filter;
pub mod load;
pub mod model;
pub mod routes;

pub use config::TimberConfig;
pub use engine::run;
pub use error::{ErrorKind, TimberError};
pub use filter::Selection;
pub use model::{LogRecord, RecordSet, TimberReport};
pub use routes::RegionTable;
