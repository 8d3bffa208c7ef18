use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum SessionlinkerError {
    Validation(String),
    NotFound(String),
    Expired(String),
    Storage(String),
    Serialization(String),
    Config(String),
    Template(String),
    FileOperation(String),
}

impl SessionlinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SessionlinkerError::Validation(_) => "E001",
            SessionlinkerError::NotFound(_) => "E002",
            SessionlinkerError::Expired(_) => "E003",
            SessionlinkerError::Storage(_) => "E004",
            SessionlinkerError::Serialization(_) => "E005",
            SessionlinkerError::Config(_) => "E006",
            SessionlinkerError::Template(_) => "E007",
            SessionlinkerError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SessionlinkerError::Validation(_) => "Validation Error",
            SessionlinkerError::NotFound(_) => "Resource Not Found",
            SessionlinkerError::Expired(_) => "Link Expired",
            SessionlinkerError::Storage(_) => "Session Storage Error",
            SessionlinkerError::Serialization(_) => "Serialization Error",
            SessionlinkerError::Config(_) => "Configuration Error",
            SessionlinkerError::Template(_) => "Template Error",
            SessionlinkerError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SessionlinkerError::Validation(msg)
            | SessionlinkerError::NotFound(msg)
            | SessionlinkerError::Expired(msg)
            | SessionlinkerError::Storage(msg)
            | SessionlinkerError::Serialization(msg)
            | SessionlinkerError::Config(msg)
            | SessionlinkerError::Template(msg)
            | SessionlinkerError::FileOperation(msg) => msg,
        }
    }

    /// HTTP status used when the error reaches a handler boundary
    pub fn http_status(&self) -> StatusCode {
        match self {
            SessionlinkerError::Validation(_) => StatusCode::BAD_REQUEST,
            SessionlinkerError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionlinkerError::Expired(_) => StatusCode::GONE,
            SessionlinkerError::Storage(_)
            | SessionlinkerError::Serialization(_)
            | SessionlinkerError::Config(_)
            | SessionlinkerError::Template(_)
            | SessionlinkerError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SessionlinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SessionlinkerError {}

// 便捷的构造函数
impl SessionlinkerError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::Expired(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::Storage(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::Config(msg.into())
    }

    pub fn template<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::Template(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        SessionlinkerError::FileOperation(msg.into())
    }
}

impl From<std::io::Error> for SessionlinkerError {
    fn from(err: std::io::Error) -> Self {
        SessionlinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SessionlinkerError {
    fn from(err: serde_json::Error) -> Self {
        SessionlinkerError::Serialization(err.to_string())
    }
}

impl From<tera::Error> for SessionlinkerError {
    fn from(err: tera::Error) -> Self {
        SessionlinkerError::Template(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionlinkerError {
    fn from(err: toml::ser::Error) -> Self {
        SessionlinkerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SessionlinkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            SessionlinkerError::validation("x"),
            SessionlinkerError::not_found("x"),
            SessionlinkerError::expired("x"),
            SessionlinkerError::storage("x"),
            SessionlinkerError::serialization("x"),
            SessionlinkerError::config("x"),
            SessionlinkerError::template("x"),
            SessionlinkerError::file_operation("x"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let err = SessionlinkerError::not_found("Short URL not found");
        assert_eq!(err.format_simple(), "Resource Not Found: Short URL not found");
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            SessionlinkerError::expired("gone").http_status(),
            StatusCode::GONE
        );
        assert_eq!(
            SessionlinkerError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SessionlinkerError::storage("oops").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let converted: SessionlinkerError = err.into();
        assert!(matches!(converted, SessionlinkerError::Serialization(_)));
    }
}
