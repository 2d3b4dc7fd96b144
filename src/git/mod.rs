pub mod backend;
pub mod config;
pub mod operations;

// Re-export commonly used items
pub use backend::{GitCli, VcsBackend};
pub use config::*;
pub use operations::*;
