use serde::{Deserialize, Serialize};

/// Envelope wrapped around every JSON body the API returns.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.to_string(),
            data: Some(data),
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn created(data: T, message: &str) -> Self {
        Self {
            code: 201,
            ..Self::success(data, message)
        }
    }

    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.to_string(),
            data: None,
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn failure(code: u16, message: &str, errors: Vec<ErrorDetail>) -> Self {
        Self {
            success: false,
            code,
            message: message.to_string(),
            data: None,
            errors: Some(errors),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn single(code: u16, error_code: &str, field: Option<String>, message: &str) -> Self {
        Self::failure(
            code,
            message,
            vec![ErrorDetail {
                field,
                code: error_code.to_string(),
                message: message.to_string(),
            }],
        )
    }

    pub fn validation_error(errors: Vec<ErrorDetail>) -> Self {
        Self::failure(400, "Validation failed", errors)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::single(400, "BAD_REQUEST", None, message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::single(401, "UNAUTHORIZED", None, message)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::single(403, "FORBIDDEN", None, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::single(404, "NOT_FOUND", None, message)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::single(409, error_code, field, message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::single(500, "INTERNAL_ERROR", None, message)
    }
}

pub mod error_codes {
    pub const RESOURCE_DUPLICATE: &str = "RESOURCE_001";
    pub const RESOURCE_IN_USE: &str = "RESOURCE_002";

    pub const SHIFT_DUPLICATE: &str = "SHIFT_001";

    pub const SHIFT_TYPE_CODE_EXISTS: &str = "SHIFT_TYPE_001";
    pub const SHIFT_TYPE_IN_USE: &str = "SHIFT_TYPE_002";

    pub const SWAP_NOT_PENDING: &str = "SWAP_001";
    pub const SWAP_NOT_APPROVED: &str = "SWAP_002";

    pub const USER_EMAIL_EXISTS: &str = "USER_001";
}
