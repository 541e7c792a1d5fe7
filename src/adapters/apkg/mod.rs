//! `.apkg` package writer: a zip holding the collection database, the media
//! manifest and the media files themselves.

pub mod collection;

use crate::domain::model::Package;
use crate::utils::error::Result;
use serde_json::{Map, Value};
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

pub const COLLECTION_ENTRY: &str = "collection.anki2";
pub const MEDIA_MANIFEST_ENTRY: &str = "media";

/// Serializes `package` into the bytes of an `.apkg` archive.
///
/// The collection database is built in a temporary file that is removed when
/// this function returns, whatever the outcome.
pub fn package_bytes(package: &Package) -> Result<Vec<u8>> {
    let db_file = tempfile::NamedTempFile::new()?;
    collection::write_collection(db_file.path(), &package.deck, chrono::Utc::now())?;
    let collection = std::fs::read(db_file.path())?;

    tracing::debug!(
        "Creating package with {} notes and {} media files",
        package.deck.notes().len(),
        package.media_files.len()
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(COLLECTION_ENTRY, FileOptions::default())?;
    zip.write_all(&collection)?;

    // Media entries are named by their index; the manifest maps index -> file name.
    let mut manifest = Map::new();
    for (index, path) in package.media_files.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let data = std::fs::read(path)?;

        zip.start_file::<_, ()>(index.to_string(), FileOptions::default())?;
        zip.write_all(&data)?;
        manifest.insert(index.to_string(), Value::String(name));
    }

    zip.start_file::<_, ()>(MEDIA_MANIFEST_ENTRY, FileOptions::default())?;
    zip.write_all(serde_json::to_string(&Value::Object(manifest))?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
