use crate::core::{ConfigProvider, Storage};
use crate::utils::error::{DeckError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    reads: Rc<Cell<usize>>,
    fail_writes: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn put(&self, path: &str, content: &str) {
        self.put_bytes(path, content.as_bytes().to_vec());
    }

    pub fn put_bytes(&self, path: &str, data: Vec<u8>) {
        self.files.borrow_mut().insert(path.to_string(), data);
    }

    pub fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Storage for MockStorage {
    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        self.get_file(path).ok_or_else(|| {
            DeckError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(DeckError::IoError(std::io::Error::other(
                "No space left on device",
            )));
        }
        self.put_bytes(path, data.to_vec());
        Ok(())
    }
}

pub struct MockConfig {
    pub input_path: String,
    pub output_path: String,
    pub delimiter: u8,
}

impl MockConfig {
    pub fn new() -> Self {
        Self {
            input_path: "cartoes.csv".to_string(),
            output_path: "deck.apkg".to_string(),
            delimiter: b',',
        }
    }
}

impl ConfigProvider for MockConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn media_dir(&self) -> &str {
        "media"
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn front_column(&self) -> &str {
        "Frente"
    }

    fn back_column(&self) -> &str {
        "Verso"
    }

    fn deck_name(&self) -> &str {
        "Test Deck"
    }

    fn model_name(&self) -> &str {
        "Test Model"
    }

    fn template_name(&self) -> &str {
        "Card 1"
    }

    fn front_template(&self) -> &str {
        "{{Frente}}"
    }

    fn back_template(&self) -> &str {
        "{{FrontSide}}<hr id=answer>{{Verso}}"
    }

    fn css(&self) -> &str {
        ".card { color: black; }"
    }
}
