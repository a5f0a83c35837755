pub mod aggregator;
pub mod capabilities;
pub mod fetchers;
pub mod timestamp;
pub mod uri;
pub mod xml;

pub use crate::domain::model::{AvailableDates, Timestamp};
pub use crate::domain::ports::{ConfigProvider, TextFetcher};
pub use crate::utils::error::Result;
