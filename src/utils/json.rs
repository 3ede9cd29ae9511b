use crate::utils::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a stored JSON value into a typed record. A decode failure means
/// the stored entry is corrupt, which surfaces as an internal error.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::Internal(format!("corrupt record: {}", e)))
}

/// Encodes a typed record for storage.
pub fn encode<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(format!("encode failed: {}", e)))
}
