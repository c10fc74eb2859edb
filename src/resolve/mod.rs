pub mod error;
pub mod latest;
