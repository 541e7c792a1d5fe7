use crate::core::Pipeline;
use crate::utils::error::Result;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub total_rows: usize,
    pub notes: usize,
    pub skipped_rows: usize,
}

/// Drives a [`Pipeline`] through load, validate, build/assemble and write.
///
/// Any stage error is returned immediately; nothing is retried.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<RunSummary> {
        tracing::debug!("Stage: load");
        let table = self.pipeline.extract()?;

        tracing::debug!("Stage: validate");
        let columns = self.pipeline.validate(&table)?;

        tracing::debug!("Stage: build model and assemble notes");
        let result = self.pipeline.transform(table, columns)?;
        let total_rows = result.total_rows;
        let notes = result.deck.notes().len();
        let skipped_rows = result.skipped.len();

        if skipped_rows > 0 {
            tracing::info!("{} of {} rows added, {} skipped", notes, total_rows, skipped_rows);
        }

        tracing::debug!("Stage: write package");
        let output_path = self.pipeline.load(result)?;
        tracing::info!("Deck generated successfully: {}", output_path);

        Ok(RunSummary {
            output_path,
            total_rows,
            notes,
            skipped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::DeckPipeline;
    use crate::core::test_support::{MockConfig, MockStorage};
    use crate::utils::error::DeckError;

    #[test]
    fn test_run_reports_counts() {
        let storage = MockStorage::new();
        storage.put("cartoes.csv", "Frente,Verso\nHello,Olá\n\" \",World\nGood,Bye\n");
        let engine = EtlEngine::new(DeckPipeline::new(storage.clone(), MockConfig::new()));

        let summary = engine.run().unwrap();

        assert_eq!(
            summary,
            RunSummary {
                output_path: "deck.apkg".to_string(),
                total_rows: 3,
                notes: 2,
                skipped_rows: 1,
            }
        );
        assert!(storage.get_file("deck.apkg").is_some());
    }

    #[test]
    fn test_schema_error_stops_before_writing() {
        let storage = MockStorage::new();
        storage.put("cartoes.csv", "Front,Back\na,b\n");
        let engine = EtlEngine::new(DeckPipeline::new(storage.clone(), MockConfig::new()));

        let err = engine.run().unwrap_err();

        assert!(matches!(err, DeckError::SchemaError { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(storage.get_file("deck.apkg").is_none());
    }

    #[test]
    fn test_header_only_input_writes_empty_deck() {
        let storage = MockStorage::new();
        storage.put("cartoes.csv", "Frente,Verso\n");
        let engine = EtlEngine::new(DeckPipeline::new(storage.clone(), MockConfig::new()));

        let summary = engine.run().unwrap();

        assert_eq!(summary.notes, 0);
        assert!(storage.get_file("deck.apkg").is_some());
    }
}
