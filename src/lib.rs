pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{GoogleMapsClient, JsonListingSource, ReportRenderer};
pub use config::FinderConfig;
pub use crate::core::{
    cache::ResultCache,
    engine::{build_objectives, FinderEngine},
    evaluator::{EvaluatedListing, Evaluator},
    maps::CachedMaps,
    objective::Objective,
    pareto::{DominanceRule, ParetoFront},
    ranker::RankedListings,
};
pub use utils::error::{HouseFinderError, Result};
