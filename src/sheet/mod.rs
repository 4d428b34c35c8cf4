//! Spreadsheet data module
//!
//! Fetches a published spreadsheet as CSV and turns it into ordered,
//! type-inferred records ready for JSON.

mod error;
mod fetch;
mod infer;
mod parse;
mod value;

pub use error::SheetError;
pub use fetch::SheetSource;
pub use value::Record;
