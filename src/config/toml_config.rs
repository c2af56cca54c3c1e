use crate::config::objective::ObjectiveConfig;
use crate::config::secrets::SecretConfig;
use crate::core::evaluator::DEFAULT_CONCURRENCY;
use crate::core::pareto::DominanceRule;
use crate::domain::model::Query;
use crate::utils::error::{HouseFinderError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_unique_names,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_CACHE_DIRECTORY: &str = "caches";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    pub search: Query,
    pub objectives: Vec<ObjectiveConfig>,
    pub maps: MapsConfig,
    pub listings: ListingsConfig,
    pub output: OutputConfig,
    pub cache: Option<CacheConfig>,
    pub evaluation: Option<EvaluationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    #[serde(flatten)]
    pub secret: SecretConfig,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingsConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub concurrent_requests: Option<usize>,
    pub dominance: Option<DominanceRule>,
}

impl FinderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HouseFinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HouseFinderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HouseFinderError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("search.area", &self.search.area)?;

        if self.objectives.is_empty() {
            return Err(HouseFinderError::MissingConfigError {
                field: "objectives".to_string(),
            });
        }
        validate_unique_names("objectives", self.objectives.iter().map(|o| o.name()))?;
        for objective in &self.objectives {
            objective.validate()?;
        }

        validate_url("maps.base_url", self.maps_base_url())?;
        validate_path("listings.path", &self.listings.path)?;
        validate_path("output.path", &self.output.path)?;
        validate_path("cache.directory", self.cache_directory())?;
        validate_positive_number("evaluation.concurrent_requests", self.concurrent_requests(), 1)?;

        let valid_formats = ["csv", "json"];
        if self.output.formats.is_empty() {
            return Err(HouseFinderError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        for format in &self.output.formats {
            if !valid_formats.contains(&format.as_str()) {
                return Err(HouseFinderError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn maps_base_url(&self) -> &str {
        self.maps.base_url.as_deref().unwrap_or(DEFAULT_MAPS_BASE_URL)
    }

    pub fn cache_directory(&self) -> &str {
        self.cache
            .as_ref()
            .map(|c| c.directory.as_str())
            .unwrap_or(DEFAULT_CACHE_DIRECTORY)
    }

    pub fn concurrent_requests(&self) -> usize {
        self.evaluation
            .as_ref()
            .and_then(|e| e.concurrent_requests)
            .unwrap_or(DEFAULT_CONCURRENCY)
    }

    pub fn dominance_rule(&self) -> DominanceRule {
        self.evaluation
            .as_ref()
            .and_then(|e| e.dominance)
            .unwrap_or_default()
    }
}

impl Validate for FinderConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
