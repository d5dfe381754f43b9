//! Spreadsheet codecs for the report pipeline

pub mod preview;
pub mod reader;
pub mod writer;

pub use preview::render_preview;
pub use reader::{decode_cell, read_report};
pub use writer::write_table;
