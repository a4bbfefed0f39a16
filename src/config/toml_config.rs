use crate::adapters::output::OutputFormat;
use crate::core::reports::{DEFAULT_LIMIT, DEFAULT_MAX_PRICE, DEFAULT_TYPE_PREFIX};
use crate::core::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_DATABASE_PATH: &str = "tourism.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    pub database: DatabaseConfig,
    pub defaults: Option<DefaultsConfig>,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub limit: Option<usize>,
    pub max_price: Option<f64>,
    pub type_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: DEFAULT_DATABASE_PATH.to_string(),
            },
            defaults: None,
            output: None,
            logging: None,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl ReportsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TOURISM_DB})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("database.path", &self.database.path)?;

        if let Some(defaults) = &self.defaults {
            if let Some(limit) = defaults.limit {
                validation::validate_positive_number("defaults.limit", limit, 1)?;
            }
            if let Some(max_price) = defaults.max_price {
                validation::validate_price("defaults.max_price", max_price)?;
            }
            if let Some(prefix) = &defaults.type_prefix {
                validation::validate_non_empty_string("defaults.type_prefix", prefix)?;
            }
        }

        Ok(())
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(false)
    }
}

impl ConfigProvider for ReportsConfig {
    fn database_path(&self) -> &str {
        &self.database.path
    }

    fn default_limit(&self) -> usize {
        self.defaults
            .as_ref()
            .and_then(|d| d.limit)
            .unwrap_or(DEFAULT_LIMIT)
    }

    fn default_max_price(&self) -> f64 {
        self.defaults
            .as_ref()
            .and_then(|d| d.max_price)
            .unwrap_or(DEFAULT_MAX_PRICE)
    }

    fn default_type_prefix(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.type_prefix.as_deref())
            .unwrap_or(DEFAULT_TYPE_PREFIX)
    }
}

impl Validate for ReportsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
