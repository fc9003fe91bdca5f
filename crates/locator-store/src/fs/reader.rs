use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{StoreError, StoreResult};

/// Read the store document. A missing file yields `Ok(None)`.
pub fn read_document(path: &Path) -> StoreResult<Option<Map<String, Value>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    match serde_json::from_slice::<Value>(&buf)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(StoreError::NotAnObject),
    }
}
