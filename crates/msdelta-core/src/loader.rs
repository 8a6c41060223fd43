//! Reading IR documents from disk.
//!
//! Documents are parsed in two passes: the raw JSON is first checked for
//! the container fields the graph builder walks, then deserialized into the
//! typed model. The first pass is what turns a missing `microservices` or
//! `controllers` array into a descriptive [`IrError::MalformedInput`]
//! instead of a generic serde message.

use crate::error::{IrError, Result};
use crate::ir::IrDocument;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Loads and validates an IR document from a JSON file.
pub fn load_document(path: &Path) -> Result<IrDocument> {
    let source = fs::read_to_string(path).map_err(|e| IrError::io(path, e))?;
    let doc: IrDocument = source.parse()?;

    debug!(
        "Loaded {} ({} microservices, commit {:?})",
        path.display(),
        doc.microservices.len(),
        doc.commit_id
    );

    Ok(doc)
}

/// Checks that a raw document carries every container the builder walks.
pub fn validate_shape(value: &Value) -> Result<()> {
    let root = value
        .as_object()
        .ok_or_else(|| IrError::malformed("$", "expected a JSON object"))?;

    let microservices = match root.get("microservices") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(IrError::malformed("microservices", "expected an array")),
        None => return Err(IrError::malformed("microservices", "field is missing")),
    };

    for (i, ms) in microservices.iter().enumerate() {
        let obj = ms
            .as_object()
            .ok_or_else(|| IrError::malformed(format!("microservices[{i}]"), "expected an object"))?;

        for field in ["controllers", "services"] {
            match obj.get(field) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(IrError::malformed(
                        format!("microservices[{i}].{field}"),
                        "expected an array",
                    ))
                }
                None => {
                    return Err(IrError::malformed(
                        format!("microservices[{i}].{field}"),
                        "field is missing",
                    ))
                }
            }
        }
    }

    Ok(())
}

impl IrDocument {
    /// Validates and converts an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        validate_shape(&value)?;
        let doc: IrDocument = serde_json::from_value(value)?;
        if doc.commit_id.is_empty() {
            warn!("IR document has no commitID");
        }
        Ok(doc)
    }
}

impl FromStr for IrDocument {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }
}
