//! Data types shared by the de-identification steps
//!
//! - [`LookupRecord`]: substitute identifiers and time shift for one record
//! - [`TimeShift`]: day offset applied to dates
//! - [`DeidConfig`]: which export steps to run

mod config;
mod lookup;
mod time_shift;

pub use config::DeidConfig;
pub use lookup::LookupRecord;
pub use time_shift::{is_unshifted, TimeShift};
