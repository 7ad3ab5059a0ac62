//! Coverage threshold validation

use colored::Colorize;

use crate::analysis::Analysis;

/// Outcome of one gate
#[derive(Debug, Clone, PartialEq)]
pub struct GateResult {
    pub label: &'static str,
    /// Measured coverage in percent, `None` when the bucket is empty
    pub coverage: Option<f64>,
    pub threshold: f64,
    pub passed: bool,
}

impl GateResult {
    fn new(label: &'static str, rate: Option<f64>, threshold: f64) -> Self {
        let coverage = rate.map(|r| r * 100.0);
        Self {
            label,
            coverage,
            threshold,
            // Nothing measured, nothing to fail
            passed: coverage.map(|c| c >= threshold).unwrap_or(true),
        }
    }

    pub fn delta(&self) -> Option<f64> {
        self.coverage.map(|c| c - self.threshold)
    }
}

/// Result of threshold validation
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdResult {
    pub passed: bool,
    pub gates: Vec<GateResult>,
}

impl ThresholdResult {
    pub fn print_summary(&self) {
        for gate in &self.gates {
            let status = if gate.passed { "✓".green() } else { "✗".red() };

            match (gate.coverage, gate.delta()) {
                (Some(coverage), Some(delta)) => {
                    let delta_str = if delta >= 0.0 {
                        format!("+{:.1}%", delta).green()
                    } else {
                        format!("{:.1}%", delta).red()
                    };

                    println!(
                        "  {} {} coverage: {:.1}% (threshold: {:.1}%, {})",
                        status, gate.label, coverage, gate.threshold, delta_str
                    );
                }
                _ => {
                    println!(
                        "  {} {} coverage: {} (threshold: {:.1}%)",
                        status,
                        gate.label,
                        "no lines".dimmed(),
                        gate.threshold
                    );
                }
            }
        }
    }
}

/// Validate the domain and adjusted rates against optional thresholds (percent)
pub fn validate_threshold(
    analysis: &Analysis,
    domain_threshold: Option<f64>,
    adjusted_threshold: Option<f64>,
) -> ThresholdResult {
    let mut gates = Vec::new();

    if let Some(threshold) = domain_threshold {
        gates.push(GateResult::new("Domain", analysis.domain.rate(), threshold));
    }

    if let Some(threshold) = adjusted_threshold {
        gates.push(GateResult::new("Adjusted", analysis.adjusted.rate(), threshold));
    }

    ThresholdResult {
        passed: gates.iter().all(|g| g.passed),
        gates,
    }
}
