use serde::de::DeserializeOwned;

/// A decode failure together with the JSON path it happened at (`.` for the root).
#[derive(Debug)]
pub struct PathError {
    pub path: String,
    pub source: serde_json::Error,
}

/// Deserialize with JSON-path context in error messages.
pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PathError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize::<_, T>(&mut de).map_err(|err| PathError {
        path: err.path().to_string(),
        source: err.into_inner(),
    })?;
    // trailing input has no path of its own
    de.end().map_err(|source| PathError {
        path: ".".to_owned(),
        source,
    })?;
    Ok(value)
}

/// Same as [`from_slice_with_path`], flattening the path into a message.
pub fn from_slice_with_path_message<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    from_slice_with_path(bytes)
        .map_err(|err| format!("at JSON path {} → {}", err.path, err.source))
}
