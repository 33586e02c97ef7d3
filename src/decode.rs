use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClonegenError, ClonegenResult};
use crate::ir::TypeDeclaration;

/// Deserialize with JSON-path context in error messages.
pub fn from_value_with_path<T: DeserializeOwned>(value: Value, origin: &str) -> ClonegenResult<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
        let location = err.path().to_string();
        ClonegenError::Descriptor {
            origin: origin.to_string(),
            location,
            message: err.into_inner().to_string(),
        }
    })
}

/// A document holds either one declaration or an array of them.
pub fn decode_declarations(value: Value, origin: &str) -> ClonegenResult<Vec<TypeDeclaration>> {
    match value {
        Value::Array(_) => from_value_with_path::<Vec<TypeDeclaration>>(value, origin),
        other => Ok(vec![from_value_with_path::<TypeDeclaration>(other, origin)?]),
    }
}
