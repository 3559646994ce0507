//! Configuration system

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How strictly shape bookkeeping is checked
///
/// `Strict` rejects duplicate shapes in a composite and attaching a shape
/// that already has an owner. `Fast` skips those checks. Removing an
/// unknown composite child is an error in either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Check every bookkeeping invariant
    Strict,
    /// Trust the caller
    Fast,
}

impl Validation {
    /// Strict in debug builds, fast in release builds
    pub const fn auto() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Fast
        }
    }

    /// Whether checks run
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::auto()
    }
}

/// Default edge length of a sparse grid segment, in cells
pub const DEFAULT_SEGMENT_SIZE: usize = 50;

/// # Collision Configuration
///
/// Settings shared by collider sets and grid shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Bookkeeping checks for composites and collider sets
    pub validation: Validation,
    /// Columns per sparse grid segment
    pub grid_segment_width: usize,
    /// Rows per sparse grid segment
    pub grid_segment_height: usize,
}

impl CollisionConfig {
    /// Set the validation mode
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Set the sparse grid segment size
    pub fn with_segment_size(mut self, width: usize, height: usize) -> Self {
        self.grid_segment_width = width;
        self.grid_segment_height = height;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_segment_width == 0 || self.grid_segment_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid segment size must be non-zero, got {}x{}",
                self.grid_segment_width, self.grid_segment_height
            )));
        }
        Ok(())
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            validation: Validation::auto(),
            grid_segment_width: DEFAULT_SEGMENT_SIZE,
            grid_segment_height: DEFAULT_SEGMENT_SIZE,
        }
    }
}

impl Config for CollisionConfig {}
