//! Configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::builder::{PARAM_PREFIX, Params, PgQueryBuilder};
use crate::column::ColumnFactory;
use crate::error::{LiteralError, LiteralResult};
use crate::parser::{ArrayParser, MultiRangeParser, RangeParser};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "pgliteral.toml";

/// Parser and builder settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub array: ArrayConfig,
    pub range: RangeConfig,
    pub builder: BuilderConfig,
}

/// `[array]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Element delimiter
    pub delimiter: char,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

/// `[range]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeConfig {
    /// Keep `int8` bounds as integers instead of floats
    pub native_int64: bool,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self { native_int64: true }
    }
}

/// `[builder]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Placeholder prefix for bound values
    pub param_prefix: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            param_prefix: PARAM_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn from_toml_str(text: &str) -> LiteralResult<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> LiteralResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(&content)
    }

    /// Load `./pgliteral.toml`, else `<config dir>/pgliteral/config.toml`,
    /// else defaults.
    pub fn discover() -> LiteralResult<Self> {
        match Self::candidates().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("pgliteral").join("config.toml"));
        }
        paths
    }

    fn validate(&self) -> LiteralResult<()> {
        let delimiter = self.array.delimiter;
        if matches!(delimiter, '{' | '}' | '"' | '\\') || delimiter.is_whitespace() {
            return Err(LiteralError::Config(format!(
                "array delimiter {:?} is reserved",
                self.array.delimiter
            )));
        }
        if self.builder.param_prefix.is_empty() {
            return Err(LiteralError::Config("param_prefix must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn array_parser(&self) -> ArrayParser {
        ArrayParser::new().with_delimiter(self.array.delimiter)
    }

    pub fn range_parser(&self) -> RangeParser {
        RangeParser::new().with_native_int64(self.range.native_int64)
    }

    pub fn multirange_parser(&self) -> MultiRangeParser {
        MultiRangeParser::new().with_native_int64(self.range.native_int64)
    }

    pub fn column_factory(&self) -> ColumnFactory {
        ColumnFactory::new().with_native_int64(self.range.native_int64)
    }

    pub fn query_builder(&self) -> PgQueryBuilder {
        PgQueryBuilder::new().with_native_int64(self.range.native_int64)
    }

    /// An empty parameter set using the configured prefix.
    pub fn params(&self) -> Params {
        Params::with_prefix(self.builder.param_prefix.clone())
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the array delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.array.delimiter = delimiter;
        self
    }

    /// Keep or drop native 64-bit integers
    pub fn native_int64(mut self, native_int64: bool) -> Self {
        self.config.range.native_int64 = native_int64;
        self
    }

    /// Set the placeholder prefix
    pub fn param_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.builder.param_prefix = prefix.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> LiteralResult<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.array.delimiter, ',');
        assert!(config.range.native_int64);
        assert_eq!(config.builder.param_prefix, ":qp");
    }

    #[test]
    fn test_sections() {
        let config = Config::from_toml_str(
            r#"
            [array]
            delimiter = ";"

            [range]
            native_int64 = false

            [builder]
            param_prefix = ":p"
            "#,
        )
        .unwrap();
        assert_eq!(config.array_parser().delimiter(), ';');
        assert!(!config.column_factory().native_int64());
        assert_eq!(config.params().prefix(), ":p");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(matches!(
            Config::from_toml_str("[range]\nnative = true"),
            Err(LiteralError::Toml(_))
        ));
    }

    #[test]
    fn test_reserved_delimiter() {
        assert!(matches!(
            Config::builder().delimiter('{').build(),
            Err(LiteralError::Config(_))
        ));
        assert!(Config::builder().param_prefix("").build().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/pgliteral.toml"),
            Err(LiteralError::Io(_))
        ));
    }
}
