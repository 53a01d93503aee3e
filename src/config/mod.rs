//! Configuration management module

pub mod env;
pub mod headers;
pub mod parser;
pub mod validation;

// Re-export main functionality
pub use env::EnvManager;
pub use headers::parse_header_lines;
pub use parser::{display_config_summary, load_config, ConfigParser};
pub use validation::{ConfigValidator, ValidationLevel, ValidationWarning};

// Re-export from models for convenience
pub use crate::models::Config;
