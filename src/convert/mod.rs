pub mod assemble;
pub mod csv_to_json;
pub mod error;
