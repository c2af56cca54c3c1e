use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::utils::error::{HouseFinderError, Result};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("all API keys have been used")]
pub struct KeysExhaustedError;

/// 設定檔中的金鑰，可給單一 `api_key` 或多個 `api_keys`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretConfig {
    pub api_key: Option<String>,
    pub api_keys: Option<Vec<String>>,
}

/// 可輪替的 API 金鑰，配額用完時換下一把
#[derive(Debug, Clone)]
pub struct Secret {
    key: String,
    available: VecDeque<String>,
    used: Vec<String>,
}

impl Secret {
    pub fn new(keys: Vec<String>) -> std::result::Result<Self, KeysExhaustedError> {
        let mut available: VecDeque<String> = keys.into();
        let key = available.pop_front().ok_or(KeysExhaustedError)?;
        Ok(Self {
            key,
            available,
            used: Vec::new(),
        })
    }

    pub fn from_config(config: &SecretConfig) -> Result<Self> {
        let keys = match (&config.api_key, &config.api_keys) {
            (Some(key), _) => vec![key.clone()],
            (None, Some(keys)) => keys.clone(),
            (None, None) => Vec::new(),
        };

        Self::new(keys).map_err(|_| HouseFinderError::MissingConfigError {
            field: "maps.api_key | maps.api_keys".to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 換下一把金鑰
    pub fn rotate(&mut self) -> std::result::Result<&str, KeysExhaustedError> {
        let next = self.available.pop_front().ok_or(KeysExhaustedError)?;
        let previous = std::mem::replace(&mut self.key, next);
        self.used.push(previous);
        Ok(&self.key)
    }

    pub fn used(&self) -> &[String] {
        &self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate() {
        let mut secret = Secret::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(secret.key(), "a");

        assert_eq!(secret.rotate().unwrap(), "b");
        assert_eq!(secret.rotate().unwrap(), "c");
        assert_eq!(secret.rotate(), Err(KeysExhaustedError));
        assert_eq!(secret.key(), "c");
        assert_eq!(secret.used(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_from_config() {
        let single = Secret::from_config(&SecretConfig {
            api_key: Some("a".into()),
            api_keys: None,
        })
        .unwrap();
        assert_eq!(single.key(), "a");

        let many = Secret::from_config(&SecretConfig {
            api_key: None,
            api_keys: Some(vec!["k1".into(), "k2".into()]),
        })
        .unwrap();
        assert_eq!(many.key(), "k1");

        assert!(Secret::from_config(&SecretConfig::default()).is_err());
    }
}
