//! domaincov - coverage split between domain logic and presentation code
//!
//! Reads a Cobertura XML report and:
//! - Buckets every class as domain, presentation or unclassified by its path
//! - Recomputes per-class line counts from the raw line records
//! - Derives domain, presentation and adjusted (presentation excluded) rates
//! - Ranks the least covered domain classes

pub mod analysis;
pub mod classify;
pub mod config;
pub mod coverage;
pub mod error;
pub mod render;

pub use analysis::{analyze, analyze_file, AdjustedTotals, Analysis, Bucket, DomainUnit};
pub use classify::{Category, Classifier};
pub use config::{Config, MarkerConfig};
pub use coverage::{
    parse_cobertura, parse_cobertura_bytes, parse_cobertura_string, validate_threshold,
    CoverageReport,
};
pub use error::AnalyzeError;
pub use render::render;
