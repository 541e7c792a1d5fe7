use crate::config::DeckConfig;
use crate::core::model_builder::{
    DEFAULT_CSS, DEFAULT_FIELDS, DEFAULT_MODEL_NAME, DEFAULT_TEMPLATE_NAME,
};
use crate::utils::error::{DeckError, Result};
use crate::utils::validation::{validate_delimiter, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INPUT_PATH: &str = "cartoes.csv";
pub const DEFAULT_MEDIA_DIR: &str = "media";
pub const DEFAULT_OUTPUT_PATH: &str = "stairway_to_heaven.apkg";
pub const DEFAULT_DECK_NAME: &str = "Stairway to Heaven - Letra e Tradução";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub deck: DeckSection,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub path: String,
    pub media_dir: String,
    pub delimiter: String,
    pub front_column: String,
    pub back_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_INPUT_PATH.to_string(),
            media_dir: DEFAULT_MEDIA_DIR.to_string(),
            delimiter: ",".to_string(),
            front_column: DEFAULT_FIELDS[0].to_string(),
            back_column: DEFAULT_FIELDS[1].to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckSection {
    pub name: String,
}

impl Default for DeckSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_DECK_NAME.to_string(),
        }
    }
}

/// Templates left unset render the configured front and back columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub name: String,
    pub template_name: String,
    pub front_template: Option<String>,
    pub back_template: Option<String>,
    pub css: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL_NAME.to_string(),
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
            front_template: None,
            back_template: None,
            css: DEFAULT_CSS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| DeckError::ConfigError {
            message: format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeckError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeckError::ConfigError {
            message: e.to_string(),
        })?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if !missing.is_empty() {
            return Err(DeckError::ConfigError {
                message: format!("Undefined environment variable(s): {}", missing.join(", ")),
            });
        }

        Ok(result.into_owned())
    }

    /// Flattens the sections into a validated [`DeckConfig`].
    pub fn resolve(self) -> Result<DeckConfig> {
        let delimiter = validate_delimiter("input.delimiter", &self.input.delimiter)?;

        let front_template = self
            .model
            .front_template
            .unwrap_or_else(|| format!("{{{{{}}}}}", self.input.front_column));
        let back_template = self
            .model
            .back_template
            .unwrap_or_else(|| format!("{{{{{}}}}}", self.input.back_column));

        let config = DeckConfig {
            input_path: self.input.path,
            media_dir: self.input.media_dir,
            output_path: self.output.path,
            delimiter,
            front_column: self.input.front_column,
            back_column: self.input.back_column,
            deck_name: self.deck.name,
            model_name: self.model.name,
            template_name: self.model.template_name,
            front_template,
            back_template,
            css: self.model.css,
        };

        config.validate()?;
        Ok(config)
    }
}
