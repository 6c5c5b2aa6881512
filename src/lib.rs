pub mod config;
pub mod engine;
pub mod error;
pub mod logging;

pub use engine::*;
pub use error::RegistrationError;

pub use config::{Config, ConfigFormat};
pub use logging::LoggingConfig;

pub type Result<T> = std::result::Result<T, RegistrationError>;
