use crate::utils::error::{HouseFinderError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(HouseFinderError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 門檻值必須是有限的正數
pub fn validate_threshold(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Maximum must be a finite, positive number".to_string(),
        });
    }
    Ok(())
}

/// 名稱不可重複，否則分數對應會互相覆蓋
pub fn validate_unique_names<'a>(
    field_name: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(HouseFinderError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.to_string(),
                reason: "Names must be unique".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(HouseFinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("maps.base_url", "https://maps.googleapis.com").is_ok());
        assert!(validate_url("maps.base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("maps.base_url", "").is_err());
        assert!(validate_url("maps.base_url", "invalid-url").is_err());
        assert!(validate_url("maps.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("evaluation.concurrent_requests", 5, 1).is_ok());
        assert!(validate_positive_number("evaluation.concurrent_requests", 0, 1).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold("objectives[0].maximum", 30.0).is_ok());
        assert!(validate_threshold("objectives[0].maximum", 0.0).is_err());
        assert!(validate_threshold("objectives[0].maximum", -5.0).is_err());
        assert!(validate_threshold("objectives[0].maximum", f64::NAN).is_err());
        assert!(validate_threshold("objectives[0].maximum", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_unique_names() {
        assert!(validate_unique_names("objectives", ["price", "commute"]).is_ok());
        assert!(validate_unique_names("objectives", ["price", "price"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("hour", 9u32, 0, 23).is_ok());
        assert!(validate_range("hour", 24u32, 0, 23).is_err());
    }
}
