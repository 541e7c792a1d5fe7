use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Separator Anki places between field values of a note.
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// One data row of the input table, before any column is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based position among data rows (header excluded).
    pub number: usize,
    /// 1-based line of the record in the source file.
    pub line: u64,
    pub values: Vec<String>,
}

impl Record {
    /// Missing trailing cells read as empty.
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Header positions of the front and back columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub front: usize,
    pub back: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub number: usize,
    pub line: u64,
    pub front: String,
    pub back: String,
}

impl Row {
    pub fn from_record(record: &Record, columns: ColumnIndices) -> Self {
        Self {
            number: record.number,
            line: record.line,
            front: record.get(columns.front).trim().to_string(),
            back: record.get(columns.back).trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    pub name: String,
    /// Question side markup.
    pub qfmt: String,
    /// Answer side markup.
    pub afmt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardModel {
    pub id: i64,
    pub name: String,
    pub fields: Vec<Field>,
    pub templates: Vec<CardTemplate>,
    pub css: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidNote {
    #[error("model '{model}' expects {expected} fields, got {actual}")]
    FieldCount {
        model: String,
        expected: usize,
        actual: usize,
    },

    #[error("field '{field}' contains the reserved separator character U+001F")]
    ReservedSeparator { field: String },
}

#[derive(Debug, Clone)]
pub struct Note {
    model: Arc<CardModel>,
    fields: Vec<String>,
}

impl Note {
    pub fn new(model: Arc<CardModel>, fields: Vec<String>) -> Result<Self, InvalidNote> {
        if fields.len() != model.fields.len() {
            return Err(InvalidNote::FieldCount {
                model: model.name.clone(),
                expected: model.fields.len(),
                actual: fields.len(),
            });
        }

        if let Some((field, _)) = model
            .fields
            .iter()
            .zip(&fields)
            .find(|(_, value)| value.contains(FIELD_SEPARATOR))
        {
            return Err(InvalidNote::ReservedSeparator {
                field: field.name.clone(),
            });
        }

        Ok(Self { model, fields })
    }

    pub fn model(&self) -> &Arc<CardModel> {
        &self.model
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    notes: Vec<Note>,
}

impl Deck {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            notes: Vec::new(),
        }
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Distinct models referenced by the notes, in first-use order.
    pub fn models(&self) -> Vec<Arc<CardModel>> {
        let mut models: Vec<Arc<CardModel>> = Vec::new();
        for note in &self.notes {
            if !models.iter().any(|m| m.id == note.model.id) {
                models.push(Arc::clone(&note.model));
            }
        }
        models
    }
}

/// A deck ready for serialization. Media attachment is not wired yet, so the
/// list stays empty in the normal flow.
#[derive(Debug, Clone)]
pub struct Package {
    pub deck: Deck,
    pub media_files: Vec<PathBuf>,
}

impl Package {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            media_files: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct TransformResult {
    pub deck: Deck,
    pub total_rows: usize,
    /// Row-level problems that were logged and skipped.
    pub skipped: Vec<crate::utils::error::DeckError>,
}
