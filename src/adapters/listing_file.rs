use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::model::{Listing, Query};
use crate::domain::ports::ListingSource;
use crate::utils::error::{HouseFinderError, Result};

/// 從 JSON 檔讀取物件清單，套用查詢的價格區間
#[derive(Debug, Clone)]
pub struct JsonListingSource {
    path: PathBuf,
}

impl JsonListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingSource for JsonListingSource {
    async fn search(&self, query: &Query) -> Result<Vec<Listing>> {
        tracing::debug!("📂 Reading listings from {}", self.path.display());

        let data = tokio::fs::read(&self.path).await?;
        let listings: Vec<Listing> =
            serde_json::from_slice(&data).map_err(|e| HouseFinderError::ProcessingError {
                message: format!("invalid listings file {}: {}", self.path.display(), e),
            })?;

        let total = listings.len();
        let matching: Vec<Listing> = listings
            .into_iter()
            .filter(|listing| query.price.contains(listing.price))
            .collect();

        if matching.len() < total {
            tracing::info!(
                "📂 {} of {} listings fall outside the price range {}-{}",
                total - matching.len(),
                total,
                query.price.min,
                query.price.max
            );
        }

        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Range;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_search_filters_by_price() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("listings.json");
        let listings = serde_json::json!([
            {"id": "1", "location": {"lat": 51.45, "lng": -2.58}, "price": 900,
             "url": "u1", "print_url": "p1", "address": "A", "description": "", "image": ""},
            {"id": "2", "location": {"lat": 51.46, "lng": -2.59}, "price": 2500,
             "url": "u2", "print_url": "p2", "address": "B", "description": "", "image": ""}
        ]);
        std::fs::write(&path, listings.to_string()).unwrap();

        let source = JsonListingSource::new(&path);
        let query = Query {
            area: "Bristol".to_string(),
            r#type: "rent".to_string(),
            bedrooms: Range { min: 1, max: 2 },
            price: Range { min: 500, max: 1500 },
            shared: false,
        };

        let found = source.search(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = JsonListingSource::new("/nonexistent/listings.json");
        let query = Query {
            area: "Bristol".to_string(),
            r#type: "rent".to_string(),
            bedrooms: Range { min: 1, max: 1 },
            price: Range { min: 0, max: 10_000 },
            shared: false,
        };
        assert!(matches!(
            source.search(&query).await,
            Err(HouseFinderError::IoError(_))
        ));
    }
}
