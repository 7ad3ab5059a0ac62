//! Bucketing, rate derivation and ranking over a parsed report

use anyhow::Result;
use log::{debug, info, trace, warn};
use std::path::Path;

use crate::classify::{Category, Classifier};
use crate::config::MarkerConfig;
use crate::coverage::{parse_cobertura, CoverageReport, ReportTotals, UnitCoverage};

/// Declared and recomputed unit rates further apart than this are reported
const RATE_DRIFT_TOLERANCE: f64 = 0.005;

/// Line counts accumulated for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bucket {
    pub lines: u64,
    pub covered: u64,
    pub units: usize,
}

impl Bucket {
    fn add(&mut self, unit: &UnitCoverage) {
        self.lines += unit.line_count();
        self.covered += unit.covered_count();
        self.units += 1;
    }

    /// Covered fraction, or `None` for an empty bucket
    pub fn rate(&self) -> Option<f64> {
        if self.lines == 0 {
            return None;
        }
        Some(self.covered as f64 / self.lines as f64)
    }
}

/// Report totals with the presentation bucket taken out.
///
/// Signed: a report whose declared totals undercount its own classes can
/// go negative. Wide enough to hold any `u64` difference exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjustedTotals {
    pub lines: i128,
    pub covered: i128,
}

impl AdjustedTotals {
    pub fn new(totals: &ReportTotals, presentation: &Bucket) -> Self {
        Self {
            lines: i128::from(totals.lines_valid) - i128::from(presentation.lines),
            covered: i128::from(totals.lines_covered) - i128::from(presentation.covered),
        }
    }

    pub fn rate(&self) -> Option<f64> {
        if self.lines <= 0 {
            return None;
        }
        Some(self.covered as f64 / self.lines as f64)
    }
}

/// A domain unit retained for ranking
#[derive(Debug, Clone, PartialEq)]
pub struct DomainUnit {
    pub name: String,
    pub filename: String,
    pub declared_rate: f64,
    pub lines: u64,
    pub covered: u64,
}

impl From<&UnitCoverage> for DomainUnit {
    fn from(unit: &UnitCoverage) -> Self {
        Self {
            name: unit.name.clone(),
            filename: unit.filename.clone(),
            declared_rate: unit.declared_rate,
            lines: unit.line_count(),
            covered: unit.covered_count(),
        }
    }
}

/// Everything the summary is rendered from
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub totals: ReportTotals,
    pub presentation: Bucket,
    pub domain: Bucket,
    pub unclassified: Bucket,
    pub adjusted: AdjustedTotals,
    /// Domain units, lowest declared rate first
    pub domain_units: Vec<DomainUnit>,
}

impl Analysis {
    /// The `n` least covered domain units
    pub fn weakest(&self, n: usize) -> &[DomainUnit] {
        &self.domain_units[..n.min(self.domain_units.len())]
    }
}

/// Classify every unit of `report` and aggregate it into buckets
pub fn analyze(report: &CoverageReport, classifier: &Classifier) -> Analysis {
    let mut presentation = Bucket::default();
    let mut domain = Bucket::default();
    let mut unclassified = Bucket::default();
    let mut domain_units = Vec::new();

    for unit in &report.units {
        let category = classifier.classify(&unit.filename);
        trace!("{} ({}) -> {}", unit.name, unit.filename, category);

        if let Some(computed) = unit.computed_rate() {
            if (computed - unit.declared_rate).abs() > RATE_DRIFT_TOLERANCE {
                info!(
                    "{}: declared line-rate {:.4} differs from {:.4} recomputed from its lines",
                    unit.name, unit.declared_rate, computed
                );
            }
        }

        match category {
            Category::Domain => {
                domain.add(unit);
                domain_units.push(DomainUnit::from(unit));
            }
            Category::Presentation => presentation.add(unit),
            Category::Unclassified => unclassified.add(unit),
        }
    }

    // Stable: equal rates keep discovery order
    domain_units.sort_by(|a, b| a.declared_rate.total_cmp(&b.declared_rate));

    let adjusted = AdjustedTotals::new(&report.totals, &presentation);
    if adjusted.lines < 0 {
        warn!(
            "Report declares {} lines but presentation units alone account for {}",
            report.totals.lines_valid, presentation.lines
        );
    }

    debug!(
        "Buckets: domain {}/{} in {} unit(s), presentation {}/{} in {} unit(s), unclassified {}/{} in {} unit(s)",
        domain.covered,
        domain.lines,
        domain.units,
        presentation.covered,
        presentation.lines,
        presentation.units,
        unclassified.covered,
        unclassified.lines,
        unclassified.units
    );

    Analysis {
        totals: report.totals,
        presentation,
        domain,
        unclassified,
        adjusted,
        domain_units,
    }
}

/// Parse the report at `path` and analyze it against `markers`
pub fn analyze_file(path: &Path, markers: &MarkerConfig) -> Result<Analysis> {
    let classifier = Classifier::new(markers)?;
    let report = parse_cobertura(path)?;
    Ok(analyze(&report, &classifier))
}
