//! Application error types
//!
//! Sensor samples with missing fields are not errors (they are dropped where
//! they are parsed) and an enemy collision is a frame event, not a failure.

use crate::permission::PermissionError;

/// Anything that can stop the scene from mounting
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no browser window")]
    NoWindow,
    #[error("required element #{0} not found")]
    MissingElement(&'static str),
    #[error("failed to create rendering surface: {0}")]
    Surface(String),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(String),
    #[error("failed to create GPU device: {0}")]
    Device(String),
    #[error("sensor permission: {0}")]
    Permission(#[from] PermissionError),
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for AppError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        AppError::Js(format!("{value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_error_wraps() {
        let err: AppError = PermissionError::Denied("denied".into()).into();
        assert!(matches!(err, AppError::Permission(_)));
        assert_eq!(
            err.to_string(),
            "sensor permission: permission denied (denied)"
        );
    }

    #[test]
    fn test_missing_element_message() {
        let err = AppError::MissingElement("canvas");
        assert_eq!(err.to_string(), "required element #canvas not found");
    }
}
