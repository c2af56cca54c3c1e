use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::objective::{Constraint, Objective};
use crate::domain::model::{Listing, Score};
use crate::utils::error::{HouseFinderError, Result};
use crate::utils::monitor::BatchProgress;

pub const DEFAULT_CONCURRENCY: usize = 8;

/// 單一目標的分數，`score` 為 `None` 表示無法計算
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveScore {
    pub objective: String,
    pub score: Option<Score>,
}

/// 物件與其在各目標上的分數，依目標順序排列。建立後不可修改。
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedListing {
    listing: Listing,
    scores: Vec<ObjectiveScore>,
    constraints: Vec<(String, Constraint)>,
}

impl EvaluatedListing {
    pub fn new(
        listing: Listing,
        scores: Vec<ObjectiveScore>,
        constraints: Vec<(String, Constraint)>,
    ) -> Self {
        Self {
            listing,
            scores,
            constraints,
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn scores(&self) -> &[ObjectiveScore] {
        &self.scores
    }

    pub fn score(&self, objective: &str) -> Option<&Score> {
        self.scores
            .iter()
            .find(|s| s.objective == objective)
            .and_then(|s| s.score.as_ref())
    }

    /// 所有目標都有分數
    pub fn is_valid(&self) -> bool {
        self.scores.iter().all(|s| s.score.is_some())
    }

    /// 每個目標的分數都滿足其上限；缺少分數視為不滿足
    pub fn satisfies_constraints(&self) -> bool {
        self.constraints.iter().all(|(name, constraint)| {
            self.score(name)
                .map(|score| constraint.holds(score.value))
                .unwrap_or(false)
        })
    }

    /// 依目標順序的分數向量，缺少或 NaN 的分數視為最差 (`f64::INFINITY`)
    pub fn score_vector(&self) -> Vec<f64> {
        self.scores
            .iter()
            .map(|s| {
                s.score
                    .as_ref()
                    .map(|score| score.value)
                    .filter(|value| !value.is_nan())
                    .unwrap_or(f64::INFINITY)
            })
            .collect()
    }
}

/// 將 N 個物件與 M 個目標計算成 N 個 `EvaluatedListing`。
///
/// 每個 (物件, 目標) 組合各自獨立計算，同時執行的數量受 `concurrency` 限制；
/// 全部完成後才依原始順序組合。任何系統性錯誤會中止剩餘的工作。
pub struct Evaluator {
    objectives: Arc<[Objective]>,
    concurrency: usize,
}

impl Evaluator {
    pub fn new(objectives: Vec<Objective>) -> Self {
        Self {
            objectives: objectives.into(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub async fn evaluate(&self, listings: Vec<Listing>) -> Result<Vec<EvaluatedListing>> {
        let listings: Arc<[Listing]> = listings.into();
        let n_objectives = self.objectives.len();
        let total = listings.len() * n_objectives;

        tracing::info!(
            "🔎 Evaluating {} listings against {} objectives ({} lookups)",
            listings.len(),
            n_objectives,
            total
        );

        let progress = Arc::new(BatchProgress::new("Evaluation", total));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for listing_idx in 0..listings.len() {
            for objective_idx in 0..n_objectives {
                let listings = Arc::clone(&listings);
                let objectives = Arc::clone(&self.objectives);
                let semaphore = Arc::clone(&semaphore);
                let progress = Arc::clone(&progress);

                tasks.spawn(async move {
                    let _permit = semaphore.acquire_owned().await.map_err(|e| {
                        HouseFinderError::ProcessingError {
                            message: format!("evaluation semaphore closed: {}", e),
                        }
                    })?;

                    let listing = &listings[listing_idx];
                    tracing::debug!("Evaluating {} for {}", listing.address, objectives[objective_idx].name());
                    let score = objectives[objective_idx].calculate(listing).await?;
                    progress.tick();

                    Ok::<_, HouseFinderError>((listing_idx, objective_idx, score))
                });
            }
        }

        let mut grid: Vec<Vec<Option<Score>>> = vec![vec![None; n_objectives]; listings.len()];

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| HouseFinderError::ProcessingError {
                message: format!("evaluation task failed: {}", e),
            });

            match outcome.and_then(|result| result) {
                Ok((listing_idx, objective_idx, score)) => {
                    grid[listing_idx][objective_idx] = score;
                }
                Err(err) => {
                    tracing::error!("❌ Aborting evaluation batch: {}", err);
                    tasks.abort_all();
                    return Err(err);
                }
            }
        }

        progress.log_final();

        let constraints = self.constraints();
        let evaluated = listings
            .iter()
            .zip(grid)
            .map(|(listing, row)| {
                let scores = self
                    .objectives
                    .iter()
                    .zip(row)
                    .map(|(objective, score)| ObjectiveScore {
                        objective: objective.name().to_string(),
                        score,
                    })
                    .collect();
                EvaluatedListing::new(listing.clone(), scores, constraints.clone())
            })
            .collect();

        Ok(evaluated)
    }

    fn constraints(&self) -> Vec<(String, Constraint)> {
        self.objectives
            .iter()
            .map(|objective| (objective.name().to_string(), objective.constraint()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Location;

    fn listing(id: &str, price: u32) -> Listing {
        Listing {
            id: id.to_string(),
            location: Location::new(51.5, -0.1),
            price,
            url: format!("https://example.com/{}", id),
            print_url: format!("https://example.com/print/{}", id),
            address: format!("{} Test Street", id),
            description: String::new(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_price_objectives_preserve_order() {
        let evaluator = Evaluator::new(vec![
            Objective::price("Price", Some(1000.0)),
            Objective::price("Price again", None),
        ])
        .with_concurrency(2);

        let evaluated = evaluator
            .evaluate(vec![listing("a", 900), listing("b", 1100), listing("c", 500)])
            .await
            .unwrap();

        let ids: Vec<&str> = evaluated.iter().map(|e| e.listing().id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let names: Vec<&str> = evaluated[0].scores().iter().map(|s| s.objective.as_str()).collect();
        assert_eq!(names, vec!["Price", "Price again"]);

        assert!(evaluated.iter().all(|e| e.is_valid()));
        assert!(evaluated[0].satisfies_constraints());
        assert!(!evaluated[1].satisfies_constraints());
        assert_eq!(evaluated[2].score_vector(), vec![500.0, 500.0]);
    }

    #[test]
    fn test_absent_score_is_invalid() {
        let evaluated = EvaluatedListing::new(
            listing("a", 100),
            vec![
                ObjectiveScore {
                    objective: "Price".to_string(),
                    score: Some(Score::new(100.0, "£100")),
                },
                ObjectiveScore {
                    objective: "Commute".to_string(),
                    score: None,
                },
            ],
            vec![
                ("Price".to_string(), Constraint::unbounded()),
                ("Commute".to_string(), Constraint::unbounded()),
            ],
        );

        assert!(!evaluated.is_valid());
        assert!(!evaluated.satisfies_constraints());
        assert_eq!(evaluated.score_vector()[1], f64::INFINITY);
    }

    #[test]
    fn test_nan_score_ranks_as_worst() {
        let evaluated = EvaluatedListing::new(
            listing("a", 100),
            vec![ObjectiveScore {
                objective: "Commute".to_string(),
                score: Some(Score::new(f64::NAN, "NaN min")),
            }],
            vec![("Commute".to_string(), Constraint::unbounded())],
        );

        assert_eq!(evaluated.score_vector(), vec![f64::INFINITY]);
    }
}
