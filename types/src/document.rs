//! References to uploaded residency documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the resident's proof-of-address document can be found.
///
/// The server normally returns a storage path after an upload. When it
/// doesn't, the client keeps a local reference so a preview can still be
/// rendered until the next profile read supplies the real path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentRef {
    /// Path in the backend's document storage (e.g. `docs/a.png`).
    Remote { path: String },
    /// The file the resident just uploaded, known only to this client.
    Local { file_name: String },
}

impl DocumentRef {
    pub fn remote(path: impl Into<String>) -> Self {
        Self::Remote { path: path.into() }
    }

    pub fn local(file_name: impl Into<String>) -> Self {
        Self::Local {
            file_name: file_name.into(),
        }
    }

    /// Build a reference from an optional server path, ignoring blanks.
    pub fn from_server_path(path: Option<&str>) -> Option<Self> {
        path.map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Self::remote)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { path } => f.write_str(path),
            Self::Local { file_name } => write!(f, "local:{file_name}"),
        }
    }
}

/// A file the resident picked for upload: declared media type plus raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
