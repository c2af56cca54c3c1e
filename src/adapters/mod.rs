// Adapters layer: concrete implementations of the domain ports (maps, listings, reports)

pub mod google_maps;
pub mod listing_file;
pub mod report;

pub use google_maps::GoogleMapsClient;
pub use listing_file::JsonListingSource;
pub use report::ReportRenderer;
