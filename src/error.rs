//! Startup configuration errors
//!
//! Ticks never fail; everything that can go wrong is caught while loading
//! the configuration, before the first frame.

/// Error type for configuration loading and validation
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Configuration text is not valid JSON for `GameConfig`
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Arena must have positive, finite dimensions
    #[error("Invalid arena size {width}x{height}")]
    InvalidArena { width: f32, height: f32 },

    /// A tuning value is out of range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },

    /// Fewer scenes than the phase bands need
    #[error("Need at least {needed} scenes, found {found}")]
    MissingScenes { needed: usize, found: usize },

    /// Scene has no layers
    #[error("Scene '{0}' has no layers")]
    EmptyScene(String),

    /// More layers than a scene's texture id range holds
    #[error("Scene '{scene}' has {count} layers, at most {max} allowed")]
    TooManyLayers {
        scene: String,
        count: usize,
        max: usize,
    },

    /// Two scenes share a name
    #[error("Duplicate scene name '{0}'")]
    DuplicateScene(String),

    /// A layer definition is malformed
    #[error("Scene '{scene}' layer {layer}: {reason}")]
    InvalidLayer {
        scene: String,
        layer: usize,
        reason: String,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
