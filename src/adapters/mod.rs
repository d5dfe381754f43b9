// Adapters layer: concrete spreadsheet codecs. Local storage lives in config::cli.

pub mod excel;
