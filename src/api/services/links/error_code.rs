//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::SessionlinkerError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    BatchSizeTooLarge = 1010,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkValidationFailed = 3002,
    LinkExpired = 3003,
    LinkStorageError = 3005,
}

impl From<&SessionlinkerError> for ErrorCode {
    fn from(err: &SessionlinkerError) -> Self {
        match err {
            SessionlinkerError::Validation(_) => ErrorCode::LinkValidationFailed,
            SessionlinkerError::NotFound(_) => ErrorCode::LinkNotFound,
            SessionlinkerError::Expired(_) => ErrorCode::LinkExpired,
            SessionlinkerError::Storage(_) => ErrorCode::LinkStorageError,
            SessionlinkerError::Serialization(_)
            | SessionlinkerError::Config(_)
            | SessionlinkerError::Template(_)
            | SessionlinkerError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
