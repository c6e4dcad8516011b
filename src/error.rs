use thiserror::Error;

/// Rejected surface or airframe configuration
///
/// Returned when a configuration is built or loaded. The per-step force computation never fails.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid parameter '{name}' with value {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
    #[error("Surface '{name}': {source}")]
    Surface {
        name: String,
        #[source]
        source: Box<ConfigError>,
    },
    #[error("Invalid airframe configuration: {0}")]
    ValidationError(String),
}

impl ConfigError {
    pub(crate) fn in_surface(self, name: &str) -> Self {
        ConfigError::Surface {
            name: name.to_owned(),
            source: Box::new(self),
        }
    }
}
