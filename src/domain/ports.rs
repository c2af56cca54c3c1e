use async_trait::async_trait;
use thiserror::Error;

use crate::core::ranker::RankedListings;
use crate::domain::model::{Listing, Location, Query, TravelTimeQuery};
use crate::utils::error::{HouseFinderError, Result};

/// 路線/地理服務回傳的錯誤
#[derive(Error, Debug)]
pub enum MapsError {
    /// 單一物件查無結果，例如找不到路線
    #[error("no result: {0}")]
    NoResult(String),

    #[error("request denied: {0}")]
    Unauthorized(String),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl MapsError {
    /// 系統性錯誤會中止整個批次，不能當成單一物件無效處理
    pub fn is_systemic(&self) -> bool {
        !matches!(self, MapsError::NoResult(_))
    }
}

impl From<MapsError> for HouseFinderError {
    fn from(err: MapsError) -> Self {
        HouseFinderError::ExternalServiceError {
            service: "maps".to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search(&self, query: &Query) -> Result<Vec<Listing>>;
}

/// 路線與地理編碼服務
#[async_trait]
pub trait MapsService: Send + Sync {
    /// 旅行時間，單位為秒
    async fn travel_time(&self, query: &TravelTimeQuery) -> std::result::Result<u64, MapsError>;

    async fn geocode(&self, name: &str) -> std::result::Result<Location, MapsError>;

    /// 依距離排序的最近地點
    async fn nearest_places(
        &self,
        location: Location,
        category: &str,
    ) -> std::result::Result<Vec<Location>, MapsError>;
}

/// 排名結果的輸出端，只能讀取
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, ranked: &RankedListings) -> Result<String>;
}
