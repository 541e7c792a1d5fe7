#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct, validate_non_empty_string, validate_path, Validate,
};

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckConfig {
    pub input_path: String,
    /// Reserved for media attachment; not read yet.
    pub media_dir: String,
    pub output_path: String,
    pub delimiter: u8,
    pub front_column: String,
    pub back_column: String,
    pub deck_name: String,
    pub model_name: String,
    pub template_name: String,
    pub front_template: String,
    pub back_template: String,
    pub css: String,
}

impl Validate for DeckConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input.path", &self.input_path)?;
        validate_path("input.media_dir", &self.media_dir)?;
        validate_path("output.path", &self.output_path)?;
        validate_non_empty_string("input.front_column", &self.front_column)?;
        validate_non_empty_string("input.back_column", &self.back_column)?;
        validate_distinct(
            "input.front_column",
            &self.front_column,
            "input.back_column",
            &self.back_column,
        )?;
        validate_non_empty_string("deck.name", &self.deck_name)?;
        validate_non_empty_string("model.name", &self.model_name)?;
        validate_non_empty_string("model.template_name", &self.template_name)?;
        validate_non_empty_string("model.front_template", &self.front_template)?;
        validate_non_empty_string("model.back_template", &self.back_template)?;
        Ok(())
    }
}

impl ConfigProvider for DeckConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn media_dir(&self) -> &str {
        &self.media_dir
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn front_column(&self) -> &str {
        &self.front_column
    }

    fn back_column(&self) -> &str {
        &self.back_column
    }

    fn deck_name(&self) -> &str {
        &self.deck_name
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn template_name(&self) -> &str {
        &self.template_name
    }

    fn front_template(&self) -> &str {
        &self.front_template
    }

    fn back_template(&self) -> &str {
        &self.back_template
    }

    fn css(&self) -> &str {
        &self.css
    }
}
