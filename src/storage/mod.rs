pub mod sqlite;

pub use sqlite::{BrandStats, ReportSummary, Storage};
