use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by the total endpoint. Only `total` is read; anything else
/// the server sends along is ignored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TotalResponse {
    pub total: Value,
}

impl TotalResponse {
    pub fn new(total: impl Into<Value>) -> Self {
        Self {
            total: total.into(),
        }
    }

    /// Text written into the total display.
    pub fn display_text(&self) -> String {
        match &self.total {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            other => other.to_string(),
        }
    }
}
