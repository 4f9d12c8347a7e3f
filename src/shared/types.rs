use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let resp = ApiResponse::success(Some(vec![1, 2]), Some("ok".to_string()));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"], json!([1, 2]));
        assert_eq!(value["message"], json!("ok"));
        assert!(value["errors"].is_null());
    }

    #[test]
    fn error_envelope_carries_messages() {
        let resp =
            ApiResponse::<()>::error(Some("bad input".to_string()), Some(vec!["bad input".to_string()]));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success"], json!(false));
        assert!(value["data"].is_null());
        assert_eq!(value["errors"], json!(["bad input"]));
    }
}
