use std::fmt;
use std::sync::Arc;

use crate::core::cache::{CacheKey, ResultCache};
use crate::domain::model::{Location, TravelTimeQuery};
use crate::domain::ports::{MapsError, MapsService};
use crate::utils::error::{HouseFinderError, Result};

/// 以結果快取包裝的路線服務。
///
/// 「查無結果」會以 `None` 快取；系統性錯誤直接往上傳，不寫入快取。
#[derive(Clone)]
pub struct CachedMaps {
    service: Arc<dyn MapsService>,
    cache: Arc<ResultCache>,
}

impl CachedMaps {
    pub fn new(service: Arc<dyn MapsService>, cache: Arc<ResultCache>) -> Self {
        Self { service, cache }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// 旅行時間（秒），找不到路線時為 `None`
    pub async fn travel_time(&self, query: &TravelTimeQuery) -> Result<Option<u64>> {
        let key = CacheKey::travel_time(query)?;
        self.cache
            .get_or_compute(&key, || async {
                tracing::debug!("🧭 Routing {} -> {} via {}", query.origin, query.destination, query.mode);
                recover_no_result(self.service.travel_time(query).await)
            })
            .await
    }

    pub async fn geocode(&self, name: &str) -> Result<Option<Location>> {
        let key = CacheKey::geocode(name)?;
        self.cache
            .get_or_compute(&key, || async {
                tracing::debug!("🧭 Geocoding {}", name);
                recover_no_result(self.service.geocode(name).await)
            })
            .await
    }

    /// 依距離排序的最近地點，查無結果時為空
    pub async fn nearest_places(&self, location: Location, category: &str) -> Result<Vec<Location>> {
        let key = CacheKey::nearest_places(location, category)?;
        let places: Option<Vec<Location>> = self
            .cache
            .get_or_compute(&key, || async {
                tracing::debug!("🧭 Looking up nearest {} to {}", category, location);
                recover_no_result(self.service.nearest_places(location, category).await)
            })
            .await?;
        Ok(places.unwrap_or_default())
    }
}

impl fmt::Debug for CachedMaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedMaps")
            .field("cache_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

fn recover_no_result<T>(result: std::result::Result<T, MapsError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_systemic() => Err(HouseFinderError::from(err)),
        Err(err) => {
            tracing::debug!("No result from maps service: {}", err);
            Ok(None)
        }
    }
}
