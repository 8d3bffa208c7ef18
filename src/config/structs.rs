use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - session: 会话 cookie 与空闲回收
/// - shortener: 短码与表单限制
/// - ui: 页面刷新与跳转延迟
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub shortener: ShortenerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SL，分隔符：__
    /// 示例：SL__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> crate::errors::Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// Base used to print short links, e.g. `https://sl.example`.
    /// When unset the request's scheme and host are used.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

/// 会话配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    #[serde(default)]
    pub cookie_secure: bool,
    /// Upper bound on the bytes one session may hold (keys + values)
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

/// 短链生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenerConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    #[serde(default = "default_validity_minutes")]
    pub default_validity_minutes: i64,
    #[serde(default = "default_max_code_length")]
    pub max_code_length: usize,
    #[serde(default = "default_generate_attempts")]
    pub generate_attempts: usize,
    #[serde(default = "default_max_validity_minutes")]
    pub max_validity_minutes: i64,
}

/// 页面配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_redirect_delay_secs")]
    pub redirect_delay_secs: u64,
    #[serde(default = "default_stats_refresh_secs")]
    pub stats_refresh_secs: u64,
    #[serde(default = "default_truncate_length")]
    pub truncate_length: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_cookie_name() -> String {
    "sl_session".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    86400
}

fn default_max_sessions() -> u64 {
    10000
}

fn default_quota_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_code_length() -> usize {
    6
}

fn default_max_rows() -> usize {
    5
}

fn default_validity_minutes() -> i64 {
    30
}

fn default_max_code_length() -> usize {
    32
}

fn default_generate_attempts() -> usize {
    10
}

fn default_max_validity_minutes() -> i64 {
    // 十年
    10 * 365 * 24 * 60
}

fn default_redirect_delay_secs() -> u64 {
    2
}

fn default_stats_refresh_secs() -> u64 {
    5
}

fn default_truncate_length() -> usize {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_base_url: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_sessions: default_max_sessions(),
            cookie_secure: false,
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            max_rows: default_max_rows(),
            default_validity_minutes: default_validity_minutes(),
            max_code_length: default_max_code_length(),
            generate_attempts: default_generate_attempts(),
            max_validity_minutes: default_max_validity_minutes(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            redirect_delay_secs: default_redirect_delay_secs(),
            stats_refresh_secs: default_stats_refresh_secs(),
            truncate_length: default_truncate_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
