pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ServersConfig;

pub use crate::adapters::http::HttpTextFetcher;
pub use crate::core::aggregator::{get_layers_available_dates, AvailableDatesAggregator};
pub use crate::domain::model::{AvailableDates, Timestamp};
pub use crate::utils::error::{DatesError, Result};
