//! JSON reading and writing of whole documents.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::document::{Dialect, Document, Envelope, RawEnvelope};
use crate::error::VcdError;

/// Reads a document from a JSON file with an `openlabel` or `vcd` root.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_document(path: &Path) -> Result<(Dialect, Document), VcdError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let envelope: RawEnvelope =
        serde_json::from_reader(reader).map_err(|source| VcdError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    envelope.into_parts().map_err(VcdError::UnsupportedFormat)
}

/// Writes a document to a JSON file under the dialect's root key.
pub fn write_document(
    path: &Path,
    dialect: Dialect,
    document: &Document,
    pretty: bool,
) -> Result<(), VcdError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let envelope = Envelope { dialect, document };

    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, &envelope)
    } else {
        serde_json::to_writer(&mut writer, &envelope)
    };
    result.map_err(|source| VcdError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush()?;
    Ok(())
}

/// Parses a document from a JSON string.
pub fn from_json_str(json: &str) -> Result<(Dialect, Document), VcdError> {
    let envelope: RawEnvelope = serde_json::from_str(json)?;
    envelope.into_parts().map_err(VcdError::UnsupportedFormat)
}

/// Parses a document from raw bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<(Dialect, Document), VcdError> {
    let envelope: RawEnvelope = serde_json::from_slice(bytes)?;
    envelope.into_parts().map_err(VcdError::UnsupportedFormat)
}

/// Serializes a document to a JSON string.
pub fn to_json_string(dialect: Dialect, document: &Document, pretty: bool) -> Result<String, VcdError> {
    let envelope = Envelope { dialect, document };
    let text = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    Ok(text)
}

/// The document as a JSON value, e.g. for handing to a schema validator.
pub fn to_json_value(dialect: Dialect, document: &Document) -> Result<serde_json::Value, VcdError> {
    Ok(serde_json::to_value(Envelope { dialect, document })?)
}
