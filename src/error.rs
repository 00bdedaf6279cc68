use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum MaptyError {
    Json(serde_json::Error),
    Storage {
        operation: &'static str,
        key: String,
        message: String,
    },
    Export {
        format: &'static str,
        message: String,
    },
}

impl std::fmt::Display for MaptyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Storage {
                operation,
                key,
                message,
            } => write!(f, "Storage {operation} failed for key '{key}': {message}"),
            Self::Export { format, message } => write!(f, "{format} export failed: {message}"),
        }
    }
}

impl std::error::Error for MaptyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MaptyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<MaptyError> for JsValue {
    fn from(e: MaptyError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
