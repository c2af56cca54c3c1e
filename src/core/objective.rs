//! 評分目標。
//!
//! 所有目標都是「越小越好」：價格、到固定地點的旅行時間、
//! 到某類別最近地點的旅行時間。單一物件查詢失敗（例如找不到路線）
//! 會轉成缺少的分數，不中斷批次；系統性錯誤則往上傳。

use crate::config::objective::{ObjectiveConfig, TravelTarget};
use crate::core::maps::CachedMaps;
use crate::domain::model::{Direction, Listing, Location, Score, TimeOfDay, TravelMode, TravelTimeQuery};
use crate::utils::error::{HouseFinderError, Result};
use crate::utils::validation::Validate;

/// 目標的上限條件，沒有上限時永遠成立
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    maximum: Option<f64>,
}

impl Constraint {
    pub fn new(maximum: Option<f64>) -> Self {
        Self { maximum }
    }

    pub fn unbounded() -> Self {
        Self { maximum: None }
    }

    pub fn holds(&self, value: f64) -> bool {
        match self.maximum {
            Some(maximum) => value < maximum,
            None => true,
        }
    }

    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }
}

/// 旅行方式與時間限制，原樣傳給路線服務
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelPlan {
    pub direction: Direction,
    pub mode: TravelMode,
    pub arrival_time: Option<TimeOfDay>,
    pub departure_time: Option<TimeOfDay>,
}

impl TravelPlan {
    pub fn query(&self, listing: Location, place: Location) -> TravelTimeQuery {
        let (origin, destination) = match self.direction {
            Direction::FromListing => (listing, place),
            Direction::ToListing => (place, listing),
        };

        TravelTimeQuery {
            origin,
            destination,
            mode: self.mode,
            arrival_time: self.arrival_time,
            departure_time: self.departure_time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceObjective {
    pub name: String,
    pub constraint: Constraint,
}

#[derive(Debug, Clone)]
pub struct SingleTravelTimeObjective {
    pub name: String,
    pub constraint: Constraint,
    pub place: String,
    pub location: Location,
    pub plan: TravelPlan,
    maps: CachedMaps,
}

#[derive(Debug, Clone)]
pub struct NearestTravelTimeObjective {
    pub name: String,
    pub constraint: Constraint,
    pub category: String,
    pub plan: TravelPlan,
    maps: CachedMaps,
}

#[derive(Debug, Clone)]
pub enum Objective {
    Price(PriceObjective),
    SingleTravelTime(SingleTravelTimeObjective),
    NearestOfCategoryTravelTime(NearestTravelTimeObjective),
}

impl Objective {
    pub fn price(name: impl Into<String>, maximum: Option<f64>) -> Self {
        Objective::Price(PriceObjective {
            name: name.into(),
            constraint: Constraint::new(maximum),
        })
    }

    /// 依設定建立目標。固定地點會在這裡先完成地理編碼，
    /// 設定錯誤在任何批次工作開始前就會回報。
    pub async fn from_config(config: &ObjectiveConfig, maps: &CachedMaps) -> Result<Self> {
        config.validate()?;

        let name = config.name().to_string();
        let constraint = Constraint::new(config.maximum());

        match config {
            ObjectiveConfig::Price { .. } => Ok(Objective::Price(PriceObjective { name, constraint })),
            ObjectiveConfig::TravelTime { params, .. } => {
                let mode = params.mode()?;
                let plan_for = |direction| TravelPlan {
                    direction,
                    mode,
                    arrival_time: params.arriving_at,
                    departure_time: params.leaving_at,
                };

                match params.target()? {
                    TravelTarget::Place { name: place, direction } => {
                        let location = maps.geocode(&place).await?.ok_or_else(|| {
                            HouseFinderError::ConfigValidationError {
                                field: format!("objectives.{}.params", name),
                                message: format!("could not geocode '{}'", place),
                            }
                        })?;
                        tracing::info!("📍 Loaded {} as ({}, {})", place, location.lat, location.lng);

                        Ok(Objective::SingleTravelTime(SingleTravelTimeObjective {
                            name,
                            constraint,
                            place,
                            location,
                            plan: plan_for(direction),
                            maps: maps.clone(),
                        }))
                    }
                    TravelTarget::NearestOf { category, direction } => {
                        Ok(Objective::NearestOfCategoryTravelTime(NearestTravelTimeObjective {
                            name,
                            constraint,
                            category,
                            plan: plan_for(direction),
                            maps: maps.clone(),
                        }))
                    }
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Objective::Price(o) => &o.name,
            Objective::SingleTravelTime(o) => &o.name,
            Objective::NearestOfCategoryTravelTime(o) => &o.name,
        }
    }

    pub fn constraint(&self) -> Constraint {
        match self {
            Objective::Price(o) => o.constraint,
            Objective::SingleTravelTime(o) => o.constraint,
            Objective::NearestOfCategoryTravelTime(o) => o.constraint,
        }
    }

    pub fn maximum(&self) -> Option<f64> {
        self.constraint().maximum()
    }

    pub fn constraint_function(&self, value: f64) -> bool {
        self.constraint().holds(value)
    }

    /// 計算分數；`Ok(None)` 表示此物件無法取得分數
    pub async fn calculate(&self, listing: &Listing) -> Result<Option<Score>> {
        let value = match self {
            Objective::Price(_) => Some(listing.price as f64),
            Objective::SingleTravelTime(o) => {
                let query = o.plan.query(listing.location, o.location);
                o.maps.travel_time(&query).await?.map(|secs| secs as f64)
            }
            Objective::NearestOfCategoryTravelTime(o) => {
                let places = o.maps.nearest_places(listing.location, &o.category).await?;
                match places.first() {
                    Some(place) => {
                        let query = o.plan.query(listing.location, *place);
                        o.maps.travel_time(&query).await?.map(|secs| secs as f64)
                    }
                    None => None,
                }
            }
        };

        if value.is_none() {
            tracing::warn!("⚠️ {}: no score for {} ({})", self.name(), listing.address, listing.id);
        }

        Ok(value.map(|v| Score::new(v, self.present(v))))
    }

    pub fn present(&self, value: f64) -> String {
        match self {
            Objective::Price(_) => format!("£{}", value),
            Objective::SingleTravelTime(_) | Objective::NearestOfCategoryTravelTime(_) => {
                format!("{} min", (value / 60.0).round())
            }
        }
    }
}
