//! Configuration for schema inference

use serde::{Deserialize, Serialize};

use super::error::InferenceError;

/// Textual marker the bulk loader reads as NULL
pub const NULL_MARKER: &str = "\\N";

/// Default number of data rows sampled per file
pub const DEFAULT_SAMPLE_SIZE: usize = 10_000;

/// Parsing and sampling options for a single inference run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// First record holds the column names
    pub has_header: bool,

    /// Field delimiter (single-byte ASCII)
    pub delimiter: char,

    /// Quote character (single-byte ASCII)
    pub quote: char,

    /// Maximum number of data rows to sample (0 = all)
    pub sample_size: usize,

    /// Reject values the bulk loader cannot represent
    pub validate_values: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: ',',
            quote: '"',
            sample_size: DEFAULT_SAMPLE_SIZE,
            validate_values: true,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Check that delimiter and quote can drive a byte-oriented reader
    pub fn validate(&self) -> Result<(), InferenceError> {
        ascii_byte("delimiter", self.delimiter)?;
        ascii_byte("quote", self.quote)?;
        if self.delimiter == self.quote {
            return Err(InferenceError::InvalidConfig(format!(
                "delimiter and quote must differ (both '{}')",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// Delimiter as the byte handed to the reader
    pub fn delimiter_byte(&self) -> Result<u8, InferenceError> {
        ascii_byte("delimiter", self.delimiter)
    }

    /// Quote as the byte handed to the reader
    pub fn quote_byte(&self) -> Result<u8, InferenceError> {
        ascii_byte("quote", self.quote)
    }

    /// The literal an escaped empty string takes in the source (`""`)
    pub fn empty_quoted(&self) -> String {
        format!("{}{}", self.quote, self.quote)
    }

    /// Parse a configuration from TOML text; missing keys take defaults
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(content: &str) -> Result<Self, InferenceError> {
        let config: InferenceConfig =
            toml::from_str(content).map_err(|e| InferenceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, InferenceError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

fn ascii_byte(what: &str, c: char) -> Result<u8, InferenceError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(InferenceError::InvalidConfig(format!(
            "{} must be a single-byte ASCII character, got '{}'",
            what, c
        )))
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Declare whether the first record is a header
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    /// Set the field delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn quote(mut self, quote: char) -> Self {
        self.config.quote = quote;
        self
    }

    /// Set the sample size (0 = all rows)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Enable or disable bulk-load value validation
    pub fn validate_values(mut self, validate: bool) -> Self {
        self.config.validate_values = validate;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
