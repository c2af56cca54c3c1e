use serde::{Deserialize, Serialize};

use crate::domain::model::{Direction, TimeOfDay, TravelMode};
use crate::utils::error::{HouseFinderError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_threshold, Validate};

/// 設定檔中的目標定義，以 `type` 欄位區分種類
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveConfig {
    #[serde(alias = "rent")]
    Price {
        name: String,
        #[serde(default)]
        maximum: Option<f64>,
    },
    TravelTime {
        name: String,
        #[serde(default)]
        maximum: Option<f64>,
        params: TravelTimeParams,
    },
}

/// 旅行時間參數：`to`、`from`、`to_any`、`from_any` 只能擇一
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeParams {
    pub to: Option<String>,
    pub from: Option<String>,
    pub to_any: Option<String>,
    pub from_any: Option<String>,
    pub via: Option<TravelMode>,
    pub arriving_at: Option<TimeOfDay>,
    pub leaving_at: Option<TimeOfDay>,
}

/// 旅行時間的目的地
#[derive(Debug, Clone, PartialEq)]
pub enum TravelTarget {
    /// 固定地點，建立時先做地理編碼
    Place { name: String, direction: Direction },
    /// 某類別中距離物件最近的地點
    NearestOf { category: String, direction: Direction },
}

impl ObjectiveConfig {
    pub fn name(&self) -> &str {
        match self {
            ObjectiveConfig::Price { name, .. } | ObjectiveConfig::TravelTime { name, .. } => name,
        }
    }

    pub fn maximum(&self) -> Option<f64> {
        match self {
            ObjectiveConfig::Price { maximum, .. } | ObjectiveConfig::TravelTime { maximum, .. } => {
                *maximum
            }
        }
    }
}

impl TravelTimeParams {
    /// `to = X` 表示從 X 前往物件；`from = X` 表示從物件出發前往 X。
    /// `to_any = C` 則是從物件前往最近的 C。
    pub fn target(&self) -> Result<TravelTarget> {
        let candidates = [
            self.to.as_ref().map(|name| TravelTarget::Place {
                name: name.clone(),
                direction: Direction::ToListing,
            }),
            self.from.as_ref().map(|name| TravelTarget::Place {
                name: name.clone(),
                direction: Direction::FromListing,
            }),
            self.to_any.as_ref().map(|category| TravelTarget::NearestOf {
                category: category.clone(),
                direction: Direction::FromListing,
            }),
            self.from_any.as_ref().map(|category| TravelTarget::NearestOf {
                category: category.clone(),
                direction: Direction::ToListing,
            }),
        ];

        let mut set: Vec<TravelTarget> = candidates.into_iter().flatten().collect();
        match set.len() {
            1 => Ok(set.remove(0)),
            0 => Err(HouseFinderError::MissingConfigError {
                field: "params.to | params.from | params.to_any | params.from_any".to_string(),
            }),
            _ => Err(HouseFinderError::ConfigValidationError {
                field: "params".to_string(),
                message: "only one of to, from, to_any, from_any may be set".to_string(),
            }),
        }
    }

    pub fn mode(&self) -> Result<TravelMode> {
        self.via.ok_or_else(|| HouseFinderError::MissingConfigError {
            field: "params.via".to_string(),
        })
    }
}

impl Validate for ObjectiveConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("objectives.name", self.name())?;

        if let Some(maximum) = self.maximum() {
            validate_threshold(&format!("objectives.{}.maximum", self.name()), maximum)?;
        }

        if let ObjectiveConfig::TravelTime { params, .. } = self {
            let target = params.target()?;
            match &target {
                TravelTarget::Place { name, .. } => {
                    validate_non_empty_string(&format!("objectives.{}.params", self.name()), name)?
                }
                TravelTarget::NearestOf { category, .. } => validate_non_empty_string(
                    &format!("objectives.{}.params", self.name()),
                    category,
                )?,
            }
            params.mode()?;

            if params.arriving_at.is_some() && params.leaving_at.is_some() {
                return Err(HouseFinderError::ConfigValidationError {
                    field: format!("objectives.{}.params", self.name()),
                    message: "arriving_at and leaving_at cannot both be set".to_string(),
                });
            }
        }

        Ok(())
    }
}
