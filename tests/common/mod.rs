#![allow(dead_code)]

use async_trait::async_trait;
use house_finder::domain::model::{Listing, Location, TravelTimeQuery};
use house_finder::domain::ports::{MapsError, MapsService};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 測試物件都在這條經線上，用來分辨路線的哪一端是物件
pub const LISTING_LNG: f64 = -2.58;

pub type TravelFn = Box<dyn Fn(&TravelTimeQuery) -> Result<u64, MapsError> + Send + Sync>;

/// 記錄呼叫次數的假路線服務
pub struct StubMaps {
    travel: TravelFn,
    places: HashMap<String, Location>,
    nearest: Vec<Location>,
    delay: Option<Duration>,
    pub travel_calls: AtomicUsize,
    pub geocode_calls: AtomicUsize,
    pub nearest_calls: AtomicUsize,
}

impl StubMaps {
    pub fn new(travel: impl Fn(&TravelTimeQuery) -> Result<u64, MapsError> + Send + Sync + 'static) -> Self {
        Self {
            travel: Box::new(travel),
            places: HashMap::new(),
            nearest: Vec::new(),
            delay: None,
            travel_calls: AtomicUsize::new(0),
            geocode_calls: AtomicUsize::new(0),
            nearest_calls: AtomicUsize::new(0),
        }
    }

    /// 旅行時間為 (物件緯度 - 50) × 1000 秒，與行程方向無關
    pub fn by_latitude() -> Self {
        Self::new(|query| Ok(((listing_end(query).lat - 50.0) * 1000.0).round() as u64))
    }

    pub fn with_place(mut self, name: &str, location: Location) -> Self {
        self.places.insert(name.to_string(), location);
        self
    }

    pub fn with_nearest(mut self, places: Vec<Location>) -> Self {
        self.nearest = places;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn travel_calls(&self) -> usize {
        self.travel_calls.load(Ordering::SeqCst)
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn nearest_calls(&self) -> usize {
        self.nearest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MapsService for StubMaps {
    async fn travel_time(&self, query: &TravelTimeQuery) -> Result<u64, MapsError> {
        self.travel_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.travel)(query)
    }

    async fn geocode(&self, name: &str) -> Result<Location, MapsError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .get(name)
            .copied()
            .ok_or_else(|| MapsError::NoResult(format!("unknown place {}", name)))
    }

    async fn nearest_places(&self, _location: Location, _category: &str) -> Result<Vec<Location>, MapsError> {
        self.nearest_calls.fetch_add(1, Ordering::SeqCst);
        if self.nearest.is_empty() {
            Err(MapsError::NoResult("nothing nearby".to_string()))
        } else {
            Ok(self.nearest.clone())
        }
    }
}

pub fn listing(id: &str, lat: f64, price: u32) -> Listing {
    Listing {
        id: id.to_string(),
        location: Location::new(lat, LISTING_LNG),
        price,
        url: format!("https://listings.example/{}", id),
        print_url: format!("https://listings.example/{}/print", id),
        address: format!("{} Gloucester Road", id),
        description: String::new(),
        image: String::new(),
    }
}

/// 路線中屬於物件的那一端
pub fn listing_end(query: &TravelTimeQuery) -> Location {
    if query.origin.lng == LISTING_LNG {
        query.origin
    } else {
        query.destination
    }
}
