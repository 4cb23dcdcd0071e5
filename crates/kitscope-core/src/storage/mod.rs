//! Tabular input and output for equipment catalogs.

pub mod csv_io;

pub use csv_io::{read_records, read_records_from, write_rows, write_rows_to};
