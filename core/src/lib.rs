pub mod api;
pub mod cli;
pub mod deid;
pub mod error;
pub mod record;
pub mod types;

pub use api::Exporter;
pub use cli::report::TextReport;
pub use deid::{remove_pixel_data, shift_dates, substitute_identifiers, Deidentifier};
pub use error::{DeidError, Result};
pub use record::DicomRecord;
pub use types::*;
