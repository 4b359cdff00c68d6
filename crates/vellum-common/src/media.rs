//! Media types shared between the upload machines and the document bridge.

use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Metadata record identifying a stored file, produced by the upload
/// collaborator.
///
/// Immutable once produced; an edit yields a new descriptor that replaces
/// the old one. Only `url` is guaranteed to be present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub id: Option<SmolStr>,
    pub url: String,
    pub alt: Option<String>,
    pub mime: Option<String>,
    pub size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageDescriptor {
    /// Create a descriptor with just a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            alt: None,
            mime: None,
            size: None,
            width: None,
            height: None,
        }
    }

    /// Set the stable file id.
    pub fn with_id(mut self, id: impl Into<SmolStr>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the alt text.
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// The reference used to remove this file from the collaborator:
    /// the id when present, the url otherwise.
    pub fn removal_ref(&self) -> &str {
        match &self.id {
            Some(id) => id.as_str(),
            None => self.url.as_str(),
        }
    }

    /// Merge in alt text from the edit flow, keeping an existing alt when
    /// the edit did not provide one.
    pub fn merged_with_alt(mut self, alt: Option<String>) -> Self {
        if alt.is_some() {
            self.alt = alt;
        }
        self
    }
}

/// A locally-selected file, captured at the moment of user selection.
#[derive(Clone, Debug, PartialEq)]
pub struct FileBlob {
    /// Original filename, when the host provided one.
    pub name: Option<SmolStr>,
    /// MIME type, sniffed from the bytes when not supplied.
    pub mime: Option<String>,
    /// Raw file bytes.
    pub data: Bytes,
}

impl FileBlob {
    /// Create a blob, sniffing the MIME type from the bytes.
    pub fn new(name: Option<SmolStr>, data: Bytes) -> Self {
        let mime = data.sniff_mime_type().map(|m| m.to_string());
        Self { name, mime, data }
    }

    /// Create a blob with a known MIME type.
    pub fn with_mime(name: Option<SmolStr>, mime: impl Into<String>, data: Bytes) -> Self {
        Self {
            name,
            mime: Some(mime.into()),
            data,
        }
    }

    /// Size of the blob in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl From<Bytes> for FileBlob {
    fn from(data: Bytes) -> Self {
        Self::new(None, data)
    }
}

/// The blob produced after the user crops/rotates/zooms an image,
/// plus the alt text entered alongside it.
///
/// Exists only during the editing sub-flow; discarded after the edited
/// upload settles.
#[derive(Clone, Debug, PartialEq)]
pub struct EditedImage {
    pub blob: FileBlob,
    pub alt: Option<String>,
}

impl EditedImage {
    pub fn new(blob: FileBlob) -> Self {
        Self { blob, alt: None }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }
}
