//! Display model implementations for table and JSON output
//!
//! Display models transform domain types into CLI-friendly formats
//! with appropriate column names and serialization.

mod app_type;
mod repository;
mod result;

pub use app_type::AppTypeDisplay;
pub use repository::RepositoryDisplay;
pub use result::SummaryRow;
