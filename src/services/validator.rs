//! 输入行验证
//!
//! 验证顺序（首个失败即返回）：
//! 1. URL 非空
//! 2. URL 为合法的绝对地址
//! 3. 有效期为正数（且不超过上限）
//! 4. 自定义短码：仅字母数字、长度不超限、不与其他记录重复
//!
//! 纯函数，不修改任何状态。

use crate::config::ShortenerConfig;
use crate::storage::UrlRecord;
use crate::utils::is_alphanumeric_code;
use crate::utils::url_validator::{UrlValidationError, validate_url};

use super::shortening_form::InputRow;

/// Why a row was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UrlRequired,
    InvalidUrl,
    NonPositiveValidity,
    ValidityTooLong(i64),
    CodeNotAlphanumeric,
    CodeTooLong(usize),
    CodeTaken,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UrlRequired => write!(f, "URL is required"),
            Self::InvalidUrl => write!(f, "Invalid URL format"),
            Self::NonPositiveValidity => write!(f, "Validity must be positive"),
            Self::ValidityTooLong(max) => {
                write!(f, "Validity cannot exceed {} minutes", max)
            }
            Self::CodeNotAlphanumeric => write!(f, "Shortcode must be alphanumeric"),
            Self::CodeTooLong(max) => write!(f, "Shortcode too long (max {} chars)", max),
            Self::CodeTaken => write!(f, "Shortcode already exists."),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for crate::errors::SessionlinkerError {
    fn from(err: ValidationError) -> Self {
        crate::errors::SessionlinkerError::validation(err.to_string())
    }
}

/// Check one candidate row against the records currently stored.
///
/// A custom code owned by the record whose id equals the row's id does not
/// count as taken.
pub fn validate_row(
    row: &InputRow,
    existing: &[UrlRecord],
    limits: &ShortenerConfig,
) -> Result<(), ValidationError> {
    match validate_url(&row.original_url) {
        Ok(_) => {}
        Err(UrlValidationError::EmptyUrl) => return Err(ValidationError::UrlRequired),
        Err(UrlValidationError::InvalidFormat(_) | UrlValidationError::UnsupportedScheme(_)) => {
            return Err(ValidationError::InvalidUrl);
        }
    }

    if row.validity_minutes <= 0 {
        return Err(ValidationError::NonPositiveValidity);
    }
    if row.validity_minutes > limits.max_validity_minutes {
        return Err(ValidationError::ValidityTooLong(limits.max_validity_minutes));
    }

    if let Some(code) = row.custom_code() {
        if !is_alphanumeric_code(code) {
            return Err(ValidationError::CodeNotAlphanumeric);
        }
        if code.len() > limits.max_code_length {
            return Err(ValidationError::CodeTooLong(limits.max_code_length));
        }
        if existing
            .iter()
            .any(|record| record.shortcode == code && record.id != row.id)
        {
            return Err(ValidationError::CodeTaken);
        }
    }

    Ok(())
}
