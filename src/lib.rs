pub mod company;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod pipeline;
pub mod salary;
pub mod storage;
pub mod title;
pub mod types;

pub use config::CleanerConfig;
pub use error::{CleanerError, Result};
pub use pipeline::{clean_listings, CleanReport};
pub use types::{CleanedListing, Listing, ListingTable};
