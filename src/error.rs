use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("score must be in [0.0, 1.0], got {0}")]
    ScoreOutOfRange(f64),

    #[error("inlier ratio must be in [0.0, 1.0], got {0}")]
    InlierRatioOutOfRange(f64),

    #[error("{name} must be in [0.0, 1.0], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("logging initialization failed: {0}")]
    LoggingInit(String),
}
