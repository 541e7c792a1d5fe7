use clap::Parser;
use deckgen::utils::logger;
use deckgen::{CliConfig, DeckPipeline, EtlEngine, LocalStorage};

fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    let pipeline = DeckPipeline::new(LocalStorage::new("."), config);
    let engine = EtlEngine::new(pipeline);

    if let Err(e) = engine.run() {
        tracing::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}
