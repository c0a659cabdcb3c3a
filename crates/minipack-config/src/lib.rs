pub mod config;
pub mod discovery;
pub mod error;
pub mod settings;

// Re-export main types
pub use config::*;
pub use error::*;
pub use settings::*;

pub use discovery::{ConfigDiscovery, discover};
