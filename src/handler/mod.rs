pub mod health;
pub mod home;
pub mod log;

use serde::Serialize;

/// `{"status": "...", "message": "..."}` body shared by the JSON routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusBody {
    pub fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_body_has_no_message() {
        let value = serde_json::to_value(StatusBody::success()).unwrap();
        assert_eq!(value, json!({"status": "success"}));
    }

    #[test]
    fn test_error_body() {
        let value = serde_json::to_value(StatusBody::error("Invalid JSON")).unwrap();
        assert_eq!(value, json!({"status": "error", "message": "Invalid JSON"}));
    }
}
