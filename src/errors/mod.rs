pub mod types;
pub mod classification;

pub use types::SiteError;
pub use classification::ErrorClassification;
