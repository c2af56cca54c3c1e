use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{HouseFinderError, Result};
use crate::utils::validation::validate_range;

/// 經緯度座標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// 搜尋來源產生的物件資料，建立後不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub location: Location,
    pub price: u32,
    pub url: String,
    pub print_url: String,
    pub address: String,
    pub description: String,
    pub image: String,
}

/// 目標函數的計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: f64,
    pub presented: String,
}

impl Score {
    pub fn new(value: f64, presented: impl Into<String>) -> Self {
        Self {
            value,
            presented: presented.into(),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.presented)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 行程方向：前往物件，或從物件出發
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToListing,
    FromListing,
}

/// 一天中的時間 (HH:MM)，原樣傳給路線服務
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        validate_range("time_of_day.hour", hour, 0, 23)?;
        validate_range("time_of_day.minute", minute, 0, 59)?;
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl FromStr for TimeOfDay {
    type Err = HouseFinderError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HouseFinderError::InvalidConfigValueError {
            field: "time_of_day".to_string(),
            value: s.to_string(),
            reason: "Expected HH:MM".to_string(),
        };

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;

        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = HouseFinderError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// 路線查詢參數，也是旅行時間快取鍵的內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeQuery {
    pub origin: Location,
    pub destination: Location,
    pub mode: TravelMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<TimeOfDay>,
}

/// 數值區間，設定檔可寫成單一整數或 `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RangeRepr", into = "RangeRepr")]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RangeRepr {
    Single(u32),
    Pair([u32; 2]),
}

impl From<RangeRepr> for Range {
    fn from(value: RangeRepr) -> Self {
        match value {
            RangeRepr::Single(v) => Range { min: v, max: v },
            RangeRepr::Pair([min, max]) => Range { min, max },
        }
    }
}

impl From<Range> for RangeRepr {
    fn from(value: Range) -> Self {
        RangeRepr::Pair([value.min, value.max])
    }
}

impl Range {
    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// 物件搜尋條件，交給搜尋來源使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub area: String,
    pub r#type: String,
    pub bedrooms: Range,
    pub price: Range,
    #[serde(default)]
    pub shared: bool,
}
