use crate::adapters::apkg;
use crate::core::assembler::assemble_notes;
use crate::core::loader::{load_table, validate_columns};
use crate::core::model_builder::build_model;
use crate::core::{ColumnIndices, ConfigProvider, Deck, Package, Pipeline, Storage, Table, TransformResult};
use crate::utils::error::{DeckError, Result};
use crate::utils::ids::generate_unique_id;
use std::sync::Arc;

pub struct DeckPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DeckPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for DeckPipeline<S, C> {
    fn extract(&self) -> Result<Table> {
        let path = self.config.input_path();
        tracing::debug!("Reading input table from: {}", path);

        let table = load_table(&self.storage, path, self.config.delimiter())?;

        tracing::info!("Input file '{}' read successfully ({} rows).", path, table.len());
        Ok(table)
    }

    fn validate(&self, table: &Table) -> Result<ColumnIndices> {
        let columns = validate_columns(table, self.config.front_column(), self.config.back_column())?;
        tracing::debug!(
            "Using column {} for '{}' and column {} for '{}'",
            columns.front,
            self.config.front_column(),
            columns.back,
            self.config.back_column()
        );
        Ok(columns)
    }

    fn transform(&self, table: Table, columns: ColumnIndices) -> Result<TransformResult> {
        let model = Arc::new(build_model(&self.config));
        let mut deck = Deck::new(generate_unique_id(), self.config.deck_name());
        tracing::debug!("Created deck '{}' (id {})", deck.name, deck.id);

        let skipped = assemble_notes(
            &table,
            columns,
            (self.config.front_column(), self.config.back_column()),
            &model,
            &mut deck,
        );

        Ok(TransformResult {
            deck,
            total_rows: table.len(),
            skipped,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();
        tracing::debug!(
            "Packaging without media; '{}' is reserved for media files",
            self.config.media_dir()
        );

        let package = Package::new(result.deck);
        let data = apkg::package_bytes(&package).map_err(|e| DeckError::write(output_path, e))?;

        tracing::debug!("Writing package ({} bytes) to storage", data.len());
        self.storage
            .write_file(output_path, &data)
            .map_err(|e| DeckError::write(output_path, e))?;

        Ok(output_path.to_string())
    }
}
