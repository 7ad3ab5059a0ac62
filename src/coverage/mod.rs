//! Coverage module
//!
//! Provides:
//! - Cobertura XML parsing
//! - Threshold validation

mod cobertura;
mod threshold;

pub use cobertura::*;
pub use threshold::*;

/// Totals declared on the report root. Trusted as-is, never recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportTotals {
    pub lines_valid: u64,
    pub lines_covered: u64,
    pub line_rate: f64,
}

/// A single measurable source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    pub hits: u64,
}

impl LineRecord {
    pub fn is_covered(&self) -> bool {
        self.hits > 0
    }
}

/// One `<class>` of the report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitCoverage {
    pub name: String,
    pub filename: String,
    /// The unit's own `line-rate`. Kept for display and ranking only.
    pub declared_rate: f64,
    pub lines: Vec<LineRecord>,
}

impl UnitCoverage {
    pub fn line_count(&self) -> u64 {
        self.lines.len() as u64
    }

    pub fn covered_count(&self) -> u64 {
        self.lines.iter().filter(|l| l.is_covered()).count() as u64
    }

    /// Rate recomputed from the line records, if the unit has any lines
    pub fn computed_rate(&self) -> Option<f64> {
        let total = self.line_count();
        if total == 0 {
            return None;
        }
        Some(self.covered_count() as f64 / total as f64)
    }
}

/// A fully parsed coverage report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    pub totals: ReportTotals,
    /// Units in document order
    pub units: Vec<UnitCoverage>,
}
