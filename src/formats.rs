//! Output formats for token tables
//!
//! Every format implements [`Formatter`] and is looked up by name through
//! [`FormatRegistry`]:
//! - `csv`: the export format, byte-identical to what the analyzer prints
//! - `json`: a pretty-printed array of token objects
//! - `table`: an aligned text grid with a token count, for terminals

pub mod csv;
pub mod json;
pub mod registry;
pub mod table;

pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use table::TableFormatter;
