pub mod dataset;
pub(crate) mod lenient;
pub mod measurement;
pub mod station;
pub mod timestamp;
pub mod variable;
