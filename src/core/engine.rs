use crate::config::objective::ObjectiveConfig;
use crate::core::evaluator::Evaluator;
use crate::core::filter;
use crate::core::maps::CachedMaps;
use crate::core::objective::Objective;
use crate::core::pareto::DominanceRule;
use crate::core::ranker::RankedListings;
use crate::domain::model::Query;
use crate::domain::ports::{ListingSource, Renderer};
use crate::utils::error::Result;
use crate::utils::validation::validate_unique_names;

/// 依設定建立所有目標，任何設定錯誤都在批次開始前回報
pub async fn build_objectives(configs: &[ObjectiveConfig], maps: &CachedMaps) -> Result<Vec<Objective>> {
    validate_unique_names("objectives", configs.iter().map(|c| c.name()))?;

    let mut objectives = Vec::with_capacity(configs.len());
    for config in configs {
        objectives.push(Objective::from_config(config, maps).await?);
    }
    Ok(objectives)
}

pub struct FinderEngine<S: ListingSource, R: Renderer> {
    source: S,
    renderer: R,
    evaluator: Evaluator,
    query: Query,
    rule: DominanceRule,
}

impl<S: ListingSource, R: Renderer> FinderEngine<S, R> {
    pub fn new(source: S, renderer: R, evaluator: Evaluator, query: Query) -> Self {
        Self {
            source,
            renderer,
            evaluator,
            query,
            rule: DominanceRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: DominanceRule) -> Self {
        self.rule = rule;
        self
    }

    /// 搜尋、評分、篩選、排名，不輸出
    pub async fn rank(&self) -> Result<RankedListings> {
        tracing::info!("🏠 Searching listings in {}", self.query.area);
        let listings = self.source.search(&self.query).await?;
        tracing::info!("🏠 Found {} listings", listings.len());

        let evaluated = self.evaluator.evaluate(listings).await?;
        let outcome = filter::apply(evaluated);

        Ok(RankedListings::rank(
            self.evaluator.objectives(),
            self.rule,
            outcome.kept,
        ))
    }

    /// 完整流程；任何致命錯誤都不會產生部分輸出
    pub async fn run(&self) -> Result<String> {
        let ranked = self.rank().await?;

        tracing::info!("📝 Rendering {} ranked listings", ranked.len());
        let output = self.renderer.render(&ranked).await?;
        tracing::info!("📁 Output saved to: {}", output);

        Ok(output)
    }
}
