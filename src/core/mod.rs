pub mod cache;
pub mod engine;
pub mod evaluator;
pub mod filter;
pub mod maps;
pub mod objective;
pub mod pareto;
pub mod ranker;

pub use crate::domain::model::{Listing, Location, Query, Score};
pub use crate::domain::ports::{ListingSource, MapsError, MapsService, Renderer};
pub use crate::utils::error::Result;
