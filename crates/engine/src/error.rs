use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, missing section, etc.).
    ConfigValidation(String),
    /// A material group failed while matching; it contributes no rows.
    GroupFailed { material_id: String, message: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::GroupFailed { material_id, message } => {
                write!(f, "material '{material_id}': {message}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
