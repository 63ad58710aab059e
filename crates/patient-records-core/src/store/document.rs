//! Whole-document load and save.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{Collection, JsonStore, StoreResult};

impl JsonStore {
    /// Load every record.
    ///
    /// Never fails: a missing, unreadable or malformed file is treated as an
    /// empty collection.
    pub fn load(&self) -> Collection {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file missing, starting empty");
                return Collection::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file unreadable, starting empty");
                return Collection::new();
            }
        };

        if contents.trim().is_empty() {
            return Collection::new();
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(collection)) => collection,
            Ok(_) => {
                warn!(path = %self.path.display(), "data file is not a JSON object, starting empty");
                Collection::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file is corrupt, starting empty");
                Collection::new()
            }
        }
    }

    /// Replace the file with the given collection.
    ///
    /// Writes to a sibling temp file first and renames it into place.
    pub fn save(&self, collection: &Collection) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            let mut ser =
                serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
            collection.serialize(&mut ser)?;
            writer.flush()?;
        }
        // the temp file is created 0600; keep whatever mode the target had
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.persist(&self.path)?;

        debug!(path = %self.path.display(), records = collection.len(), "data file saved");
        Ok(())
    }
}
