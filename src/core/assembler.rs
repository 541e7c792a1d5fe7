use crate::core::{CardModel, ColumnIndices, Deck, Note, Row, Table};
use crate::utils::error::DeckError;
use std::sync::Arc;

/// Turns table rows into notes appended to `deck`, in input order.
///
/// Rows with an empty front or back after trimming, and rows whose note cannot
/// be built, are logged and skipped. The returned errors describe those rows;
/// none of them is fatal.
pub fn assemble_notes(
    table: &Table,
    columns: ColumnIndices,
    column_names: (&str, &str),
    model: &Arc<CardModel>,
    deck: &mut Deck,
) -> Vec<DeckError> {
    let total = table.len();
    let mut skipped = Vec::new();

    for record in &table.records {
        let row = Row::from_record(record, columns);

        if let Some(err) = empty_fields(&row, column_names) {
            tracing::warn!("{}. Skipping.", err);
            skipped.push(err);
            continue;
        }

        match Note::new(Arc::clone(model), vec![row.front.clone(), row.back.clone()]) {
            Ok(note) => {
                deck.add_note(note);
                tracing::info!(
                    "Added card {}/{}: {} -> {}",
                    row.number,
                    total,
                    row.front,
                    row.back
                );
            }
            Err(e) => {
                let err = DeckError::NoteConstructionError {
                    row: row.number,
                    reason: e.to_string(),
                };
                tracing::error!("{}", err);
                skipped.push(err);
            }
        }
    }

    skipped
}

fn empty_fields(row: &Row, (front_name, back_name): (&str, &str)) -> Option<DeckError> {
    let mut fields = Vec::new();
    if row.front.is_empty() {
        fields.push(front_name.to_string());
    }
    if row.back.is_empty() {
        fields.push(back_name.to_string());
    }

    if fields.is_empty() {
        None
    } else {
        Some(DeckError::EmptyFieldRow {
            row: row.number,
            line: row.line,
            fields,
        })
    }
}
