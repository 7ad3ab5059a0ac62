//! Plain-text summary of an [`Analysis`]

use crate::analysis::Analysis;
use crate::config::MarkerConfig;

const RULE_WIDTH: usize = 70;

/// Render the full summary.
///
/// Sections always appear in the same order: overall, presentation, domain,
/// adjusted, ranked domain units. A rate line is left out when its bucket
/// has no lines.
pub fn render(analysis: &Analysis, markers: &MarkerConfig, top: usize) -> String {
    let mut out = String::new();
    write_summary(&mut out, analysis, markers, top);
    out
}

fn write_summary(out: &mut String, analysis: &Analysis, markers: &MarkerConfig, top: usize) {
    let rule = "=".repeat(RULE_WIDTH);

    line(out, &rule);
    line(out, "Coverage analysis");
    line(out, &rule);

    let totals = &analysis.totals;
    section(out, "Overall");
    counts(out, totals.lines_valid, totals.lines_covered);
    rate(out, Some(totals.line_rate));

    let presentation_markers: Vec<&str> = markers
        .presentation
        .iter()
        .chain(markers.entrypoints.iter())
        .map(String::as_str)
        .collect();
    section(
        out,
        &format!("Presentation: {} (excluded)", presentation_markers.join(", ")),
    );
    counts(out, analysis.presentation.lines, analysis.presentation.covered);
    rate(out, analysis.presentation.rate());

    section(out, &format!("Domain logic: {}", markers.domain.join(", ")));
    counts(out, analysis.domain.lines, analysis.domain.covered);
    rate(out, analysis.domain.rate());

    section(out, "Adjusted (presentation excluded)");
    counts(out, analysis.adjusted.lines, analysis.adjusted.covered);
    rate(out, analysis.adjusted.rate());

    section(out, "Domain units, lowest coverage first");
    for unit in analysis.weakest(top) {
        line(
            out,
            &format!(
                "  {:>6.2}% | {:>4}/{:<4} | {}",
                unit.declared_rate * 100.0,
                unit.covered,
                unit.lines,
                unit.name
            ),
        );
    }

    line(out, &rule);
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    line(out, &format!("[{}]", title));
}

fn counts(out: &mut String, lines: impl std::fmt::Display, covered: impl std::fmt::Display) {
    line(out, &format!("  Lines:        {:>6}", lines));
    line(out, &format!("  Covered:      {:>6}", covered));
}

fn rate(out: &mut String, rate: Option<f64>) {
    if let Some(r) = rate {
        line(out, &format!("  Line rate:    {:>6.2}%", r * 100.0));
    }
}
