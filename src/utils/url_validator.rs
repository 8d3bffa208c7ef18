//! URL 验证模块
//!
//! 目标地址必须是可解析的 http/https 绝对 URL

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidFormat(String),
    UnsupportedScheme(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::UnsupportedScheme(scheme) => write!(f, "Unsupported URL scheme: {}", scheme),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证 URL
///
/// 1. 去除首尾空白后不为空
/// 2. 能被解析为绝对 URL
/// 3. scheme 为 http 或 https（目标会出现在 href 和 meta refresh 中）
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }
}
