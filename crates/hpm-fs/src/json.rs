//! JSON document loading and saving
//!
//! Every JSON file the package manager writes (package configs, the tag
//! cache) is pretty-printed with a four space indent, matching the layout
//! Houdini users are used to editing by hand.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::PrettyFormatter;

use crate::{Error, NormalizedPath, Result, io};

const INDENT: &[u8] = b"    ";

/// JSON file store.
///
/// Reads go through [`io::read_text`], writes through [`io::write_atomic`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStore;

impl JsonStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and deserialize a JSON file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        serde_json::from_str(&content).map_err(|e| Error::JsonParse {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    /// Load a JSON file, first creating it from `T::default()` when it does
    /// not exist yet.
    pub fn load_or_init<T>(&self, path: &NormalizedPath) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        if !path.exists() {
            tracing::debug!(%path, "JSON store missing, creating empty file");
            let value = T::default();
            self.save(path, &value)?;
            return Ok(value);
        }
        self.load(path)
    }

    /// Serialize and atomically write a JSON file.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let content = to_pretty_string(value).map_err(|e| Error::JsonSerialize {
            path: path.to_native(),
            message: e.to_string(),
        })?;
        io::write_text(path, &content)
    }
}

/// Pretty-print a value with the four space indent used for every file this
/// workspace writes.
pub fn to_pretty_string<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
