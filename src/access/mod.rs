pub mod artifact;
pub mod error;
pub mod file_loader;
pub mod http_loader;
pub mod server;
