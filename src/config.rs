use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Normal-privilege connection used for per-user operations.
    pub url: String,
    /// Elevated connection used only for identity deletion.
    /// Falls back to `url` when unset.
    pub admin_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expires_in: String,
}

/// Outbound LLM provider settings. Sampling parameters (max_tokens,
/// temperature) are fixed by the generation flow and deliberately not
/// configurable here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: String,
    /// Request timeout for the inference call (default: 30s).
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Command line arguments for configuration overrides
#[derive(Parser, Debug, Clone)]
#[command(name = "mailassist")]
#[command(version, about = "MailAssist - AI email reply and summary service")]
pub struct CommandLineArgs {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Server host (overrides config file)
    #[arg(long, value_name = "HOST")]
    pub server_host: Option<String>,

    /// Server port (overrides config file)
    #[arg(long, value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    /// Admin database URL for identity deletion (overrides config file)
    #[arg(long, value_name = "URL")]
    pub database_admin_url: Option<String>,

    /// JWT secret key (overrides config file)
    #[arg(long, value_name = "SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT expiration time (overrides config file, e.g., "24h")
    #[arg(long, value_name = "DURATION")]
    pub jwt_expires_in: Option<String>,

    /// LLM provider base URL (overrides config file)
    #[arg(long, value_name = "URL")]
    pub llm_api_base: Option<String>,

    /// LLM model name (overrides config file)
    #[arg(long, value_name = "MODEL")]
    pub llm_model: Option<String>,

    /// LLM request timeout in seconds (overrides config file)
    #[arg(long, value_name = "SECS")]
    pub llm_timeout_secs: Option<u64>,

    /// Logging level (overrides config file, e.g., "info,mailassist=debug")
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with command line, environment variable, and file support
    ///
    /// Loading order (priority from highest to lowest):
    /// 1. Command line arguments
    /// 2. Environment variables (prefixed with APP_)
    /// 3. Configuration file (config.toml)
    /// 4. Default values
    pub fn load() -> Result<Self, anyhow::Error> {
        let cli_args = CommandLineArgs::parse();

        let config_path = cli_args.config.clone().or_else(Self::find_config_file);
        let mut config = if let Some(config_path) = config_path {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.apply_cli_overrides(&cli_args);
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_DATABASE_URL: Database URL (default: sqlite://data/mailassist.db)
    /// - APP_DATABASE_ADMIN_URL: Admin database URL (default: same as APP_DATABASE_URL)
    /// - APP_JWT_SECRET: JWT secret key
    /// - APP_JWT_EXPIRES_IN: JWT expiration time (e.g., "24h")
    /// - APP_LLM_API_BASE: LLM provider base URL
    /// - APP_LLM_MODEL: LLM model name
    /// - APP_LLM_API_KEY: LLM provider API key
    /// - APP_LLM_TIMEOUT_SECS: Inference request timeout in seconds
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,mailassist=debug")
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(db_url) = std::env::var("APP_DATABASE_URL") {
            self.database.url = db_url;
            tracing::info!("Override database.url from env");
        }

        if let Ok(admin_url) = std::env::var("APP_DATABASE_ADMIN_URL") {
            self.database.admin_url = Some(admin_url);
            tracing::info!("Override database.admin_url from env");
        }

        if let Ok(secret) = std::env::var("APP_JWT_SECRET") {
            self.auth.jwt_secret = secret;
            tracing::info!("Override auth.jwt_secret from env");
        }

        if let Ok(expires) = std::env::var("APP_JWT_EXPIRES_IN") {
            self.auth.jwt_expires_in = expires;
            tracing::info!("Override auth.jwt_expires_in from env: {}", self.auth.jwt_expires_in);
        }

        if let Ok(api_base) = std::env::var("APP_LLM_API_BASE") {
            self.llm.api_base = api_base;
            tracing::info!("Override llm.api_base from env: {}", self.llm.api_base);
        }

        if let Ok(model) = std::env::var("APP_LLM_MODEL") {
            self.llm.model = model;
            tracing::info!("Override llm.model from env: {}", self.llm.model);
        }

        if let Ok(api_key) = std::env::var("APP_LLM_API_KEY") {
            self.llm.api_key = api_key;
            tracing::info!("Override llm.api_key from env");
        }

        if let Ok(timeout) = std::env::var("APP_LLM_TIMEOUT_SECS")
            && let Ok(timeout) = timeout.parse()
        {
            self.llm.timeout_secs = timeout;
            tracing::info!("Override llm.timeout_secs from env: {}", self.llm.timeout_secs);
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }
    }

    /// Apply command line argument overrides (highest priority)
    fn apply_cli_overrides(&mut self, args: &CommandLineArgs) {
        if let Some(host) = &args.server_host {
            self.server.host = host.clone();
            tracing::info!("Override server.host from CLI: {}", self.server.host);
        }

        if let Some(port) = args.server_port {
            self.server.port = port;
            tracing::info!("Override server.port from CLI: {}", self.server.port);
        }

        if let Some(db_url) = &args.database_url {
            self.database.url = db_url.clone();
            tracing::info!("Override database.url from CLI");
        }

        if let Some(admin_url) = &args.database_admin_url {
            self.database.admin_url = Some(admin_url.clone());
            tracing::info!("Override database.admin_url from CLI");
        }

        if let Some(secret) = &args.jwt_secret {
            self.auth.jwt_secret = secret.clone();
            tracing::info!("Override auth.jwt_secret from CLI");
        }

        if let Some(expires) = &args.jwt_expires_in {
            self.auth.jwt_expires_in = expires.clone();
            tracing::info!("Override auth.jwt_expires_in from CLI: {}", self.auth.jwt_expires_in);
        }

        if let Some(api_base) = &args.llm_api_base {
            self.llm.api_base = api_base.clone();
            tracing::info!("Override llm.api_base from CLI: {}", self.llm.api_base);
        }

        if let Some(model) = &args.llm_model {
            self.llm.model = model.clone();
            tracing::info!("Override llm.model from CLI: {}", self.llm.model);
        }

        if let Some(timeout) = args.llm_timeout_secs {
            self.llm.timeout_secs = timeout;
            tracing::info!("Override llm.timeout_secs from CLI: {}", self.llm.timeout_secs);
        }

        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
            tracing::info!("Override logging.level from CLI: {}", self.logging.level);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.auth.jwt_secret == "dev-secret-key-change-in-production" {
            tracing::warn!("⚠️  WARNING: Using default JWT secret!");
            tracing::warn!(
                "⚠️  Please set APP_JWT_SECRET environment variable or update config.toml"
            );
            tracing::warn!("⚠️  This is INSECURE for production use!");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.llm.api_key.is_empty() {
            tracing::warn!("LLM API key not set; /api/generate will fail until configured");
        }

        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be > 0");
        }

        Ok(())
    }

    /// Admin connection URL, falling back to the normal-privilege URL.
    pub fn admin_database_url(&self) -> &str {
        self.database.admin_url.as_deref().unwrap_or(&self.database.url)
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: "sqlite://data/mailassist.db".to_string(), admin_url: None }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret-key-change-in-production".to_string(),
            jwt_expires_in: "24h".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            model: "meta-llama/llama-3.2-3b-instruct:free".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,mailassist=debug".to_string(),
            file: Some("logs/mailassist.log".to_string()),
        }
    }
}
