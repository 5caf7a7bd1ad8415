//! Resolution of declared MIME types to runtime codec bindings.
//!
//! The controller writer wires the resolved bindings into the generated
//! service initializer. The list is deduplicated by module and sorted so
//! output is deterministic regardless of declaration order.

use std::collections::BTreeMap;

use crate::error::GenerationError;

/// A (MIME types → codec constructor) binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderBinding {
    /// MIME types served by this codec, sorted.
    pub mime_types: Vec<String>,
    /// Runtime module providing the codec.
    pub module: String,
    /// Constructor expression relative to the module.
    pub constructor: String,
}

/// Codecs the runtime ships; MIME type to (module, constructor).
const KNOWN_CODECS: &[(&str, &str, &str)] = &[
    ("application/json", "trestle_runtime::codec::json", "JsonCodec::new()"),
    ("application/msgpack", "trestle_runtime::codec::msgpack", "MsgpackCodec::new()"),
    ("application/xml", "trestle_runtime::codec::xml", "XmlCodec::new()"),
];

/// Resolve MIME types to a minimal ordered binding list.
///
/// Defaults to JSON when nothing is declared; an unmapped MIME type is a
/// generation error naming the type.
pub fn build_encoders(mimes: &[String]) -> Result<Vec<EncoderBinding>, GenerationError> {
    let default = ["application/json".to_string()];
    let mimes: &[String] = if mimes.is_empty() { &default } else { mimes };

    let mut by_module: BTreeMap<&str, (&str, Vec<String>)> = BTreeMap::new();
    for mime in mimes {
        let codec = KNOWN_CODECS
            .iter()
            .find(|(known, _, _)| known == mime)
            .ok_or_else(|| GenerationError::UnknownEncoding { mime: mime.clone() })?;
        let entry = by_module.entry(codec.1).or_insert((codec.2, Vec::new()));
        if !entry.1.contains(mime) {
            entry.1.push(mime.clone());
        }
    }

    Ok(by_module
        .into_iter()
        .map(|(module, (constructor, mut mime_types))| {
            mime_types.sort();
            EncoderBinding {
                mime_types,
                module: module.to_string(),
                constructor: constructor.to_string(),
            }
        })
        .collect())
}
