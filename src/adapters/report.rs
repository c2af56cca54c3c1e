use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::ranker::RankedListings;
use crate::domain::ports::Renderer;
use crate::utils::error::{HouseFinderError, Result};

pub const CSV_FILE_NAME: &str = "ranked.csv";
pub const JSON_FILE_NAME: &str = "ranked.json";

/// 將排名結果寫成 CSV 與/或 JSON 報表
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    output_path: PathBuf,
    formats: Vec<String>,
}

#[derive(Serialize)]
struct RankedEntry<'a> {
    tier: usize,
    id: &'a str,
    address: &'a str,
    price: u32,
    url: &'a str,
    scores: Vec<EntryScore<'a>>,
}

#[derive(Serialize)]
struct EntryScore<'a> {
    objective: &'a str,
    value: Option<f64>,
    presented: Option<&'a str>,
}

impl ReportRenderer {
    pub fn new(output_path: impl Into<PathBuf>, formats: Vec<String>) -> Self {
        Self {
            output_path: output_path.into(),
            formats,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn entries<'a>(ranked: &'a RankedListings) -> Vec<RankedEntry<'a>> {
        ranked
            .iter()
            .map(|(tier, evaluated)| {
                let listing = evaluated.listing();
                RankedEntry {
                    tier,
                    id: &listing.id,
                    address: &listing.address,
                    price: listing.price,
                    url: &listing.url,
                    scores: ranked
                        .objectives()
                        .iter()
                        .map(|objective| {
                            let score = evaluated.score(objective.name());
                            EntryScore {
                                objective: objective.name(),
                                value: score.map(|s| s.value),
                                presented: score.map(|s| s.presented.as_str()),
                            }
                        })
                        .collect(),
                }
            })
            .collect()
    }

    fn to_csv(ranked: &RankedListings) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut headers = vec!["tier", "id", "address", "price", "url"];
        headers.extend(ranked.objectives().iter().map(|o| o.name()));
        writer.write_record(&headers)?;

        for entry in Self::entries(ranked) {
            let mut record = vec![
                entry.tier.to_string(),
                entry.id.to_string(),
                entry.address.to_string(),
                entry.price.to_string(),
                entry.url.to_string(),
            ];
            record.extend(
                entry
                    .scores
                    .iter()
                    .map(|s| s.presented.unwrap_or_default().to_string()),
            );
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| HouseFinderError::ProcessingError {
                message: format!("Failed to finish CSV report: {}", e),
            })
    }

    fn to_json(ranked: &RankedListings) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&Self::entries(ranked))?)
    }
}

#[async_trait]
impl Renderer for ReportRenderer {
    async fn render(&self, ranked: &RankedListings) -> Result<String> {
        tokio::fs::create_dir_all(&self.output_path).await?;

        for format in &self.formats {
            let (file_name, data) = match format.as_str() {
                "csv" => (CSV_FILE_NAME, Self::to_csv(ranked)?),
                "json" => (JSON_FILE_NAME, Self::to_json(ranked)?),
                other => {
                    return Err(HouseFinderError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    })
                }
            };

            let path = self.output_path.join(file_name);
            tokio::fs::write(&path, data).await?;
            tracing::debug!("📝 Wrote {}", path.display());
        }

        Ok(self.output_path.display().to_string())
    }
}
