//! Unit classification by path components

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::fmt;

use crate::config::MarkerConfig;

/// Which bucket a unit's lines are counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Domain,
    Presentation,
    Unclassified,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Domain => write!(f, "domain"),
            Category::Presentation => write!(f, "presentation"),
            Category::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Classifies source paths against a marker set.
///
/// Paths are split on both `/` and `\`, so a report produced on either
/// platform classifies the same way.
#[derive(Debug, Clone)]
pub struct Classifier {
    domain: Vec<String>,
    presentation: Vec<String>,
    entrypoints: Vec<Pattern>,
    case_sensitive: bool,
}

impl Classifier {
    pub fn new(markers: &MarkerConfig) -> Result<Self> {
        let entrypoints = markers
            .entrypoints
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid entrypoint pattern '{}'", p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            domain: markers.domain.clone(),
            presentation: markers.presentation.clone(),
            entrypoints,
            case_sensitive: markers.case_sensitive,
        })
    }

    /// Domain markers are checked first, so a path matching both sets is Domain.
    pub fn classify(&self, path: &str) -> Category {
        let (dirs, file_name) = split_path(path);

        if dirs.iter().any(|d| self.is_marker(&self.domain, d)) {
            return Category::Domain;
        }

        if dirs.iter().any(|d| self.is_marker(&self.presentation, d)) {
            return Category::Presentation;
        }

        if let Some(name) = file_name {
            let options = MatchOptions {
                case_sensitive: self.case_sensitive,
                ..MatchOptions::new()
            };
            if self.entrypoints.iter().any(|p| p.matches_with(name, options)) {
                return Category::Presentation;
            }
        }

        Category::Unclassified
    }

    fn is_marker(&self, markers: &[String], component: &str) -> bool {
        markers.iter().any(|m| {
            if self.case_sensitive {
                m == component
            } else {
                m.eq_ignore_ascii_case(component)
            }
        })
    }
}

/// Split a path into its directory components and final file name
fn split_path(path: &str) -> (Vec<&str>, Option<&str>) {
    let mut parts: Vec<&str> = path
        .split(|c| c == '/' || c == '\\')
        .filter(|p| !p.is_empty())
        .collect();

    // "Services\" with a trailing separator names a directory, not a file
    let ends_with_separator = path.ends_with('/') || path.ends_with('\\');
    let file_name = if ends_with_separator { None } else { parts.pop() };

    (parts, file_name)
}
