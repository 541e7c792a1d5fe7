use crate::config::toml_config::TomlConfig;
use crate::config::DeckConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "deckgen")]
#[command(about = "Build an Anki deck package from a two-column CSV file")]
pub struct CliConfig {
    /// Input CSV file [default: cartoes.csv]
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output package file, overwritten if present [default: stairway_to_heaven.apkg]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Media directory (reserved, not read yet) [default: media]
    #[arg(long)]
    pub media_dir: Option<String>,

    /// Deck name shown in Anki
    #[arg(long)]
    pub deck_name: Option<String>,

    /// Optional TOML file with input, deck, model and output settings
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Defaults, then the TOML file, then command-line flags.
    pub fn resolve(&self) -> Result<DeckConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(media_dir) = &self.media_dir {
            config.input.media_dir = media_dir.clone();
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(deck_name) = &self.deck_name {
            config.deck.name = deck_name.clone();
        }

        config.resolve()
    }
}
