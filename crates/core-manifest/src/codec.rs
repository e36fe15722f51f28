//! Encoding and decoding of media packages
//!
//! The engine itself does no I/O; it talks to a [`Codec`]. [`JsonCodec`] is
//! the JSON implementation used by the command-line tool and the tests.
//!
//! Document layout:
//!
//! ```json
//! {
//!   "id": "mp-1",
//!   "title": "Lecture 1",
//!   "elements": [
//!     { "type": "track", "id": "t1", "flavor": "presenter/source",
//!       "has_video": true, "has_audio": true, "tags": ["archive"],
//!       "checksum": { "type": "md5", "value": "..." } },
//!     { "type": "catalog", "id": "c1", "flavor": "dublincore/episode",
//!       "ref": { "type": "track", "id": "t1" } }
//!   ]
//! }
//! ```

use crate::element::{ElementKind, MediaPackageElement};
use crate::error::{Error, Result};
use crate::id::IdentifierGenerator;
use crate::package::MediaPackage;
use crate::validate::validate_document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Converts media packages to and from bytes
///
/// Round trips preserve identifiers, flavors, tags, checksums and
/// references of every element.
pub trait Codec {
    fn encode(&self, mp: &MediaPackage) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<MediaPackage>;
}

#[derive(Serialize)]
struct PackageDocumentRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    elements: Vec<&'a MediaPackageElement>,
}

#[derive(Deserialize)]
struct PackageDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    elements: Vec<Value>,
}

/// JSON codec
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pretty: bool,
    ids: Option<Arc<dyn IdentifierGenerator>>,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit indented JSON
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Generator given to decoded packages; UUIDs when unset
    pub fn with_id_generator(mut self, ids: Arc<dyn IdentifierGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Encode to a JSON string
    pub fn encode_to_string(&self, mp: &MediaPackage) -> Result<String> {
        let doc = PackageDocumentRef {
            id: mp.identifier(),
            title: mp.title(),
            elements: mp.elements().collect(),
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };
        Ok(json)
    }

    /// Decode from an already parsed JSON value
    pub fn decode_value(&self, value: Value) -> Result<MediaPackage> {
        validate_document(&value)?;
        let doc: PackageDocument = serde_json::from_value(value)?;

        let mut mp = MediaPackage::default();
        if let Some(ids) = &self.ids {
            mp = mp.with_id_generator(Arc::clone(ids));
        }
        mp.set_identifier(doc.id);
        mp.set_title(doc.title);

        // Fresh ids for id-less elements must not collide with ids further on
        for id in doc.elements.iter().filter_map(|raw| raw.get("id")?.as_str()) {
            mp.id_generator().reserve(id);
        }

        for raw in doc.elements {
            mp.add(decode_element(raw)?)?;
        }
        Ok(mp)
    }
}

fn decode_element(raw: Value) -> Result<MediaPackageElement> {
    let kind = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::unsupported("element without type"))?;
    // Rejects unknown variants before serde sees them
    kind.parse::<ElementKind>()?;
    Ok(serde_json::from_value(raw)?)
}

impl Codec for JsonCodec {
    fn encode(&self, mp: &MediaPackage) -> Result<Vec<u8>> {
        self.encode_to_string(mp).map(String::into_bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<MediaPackage> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.decode_value(value)
    }
}
