//! Template export of point lists.
//!
//! A template is literal text with three placeholders: `{i}` (1-based index),
//! `{x}` and `{y}`. Each point renders one copy of the template and the
//! copies are concatenated with no separator.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::doc::Point;

/// Render `template` once per point and join the results.
#[must_use]
pub fn format_points(points: &[Point], template: &str) -> String {
    let mut out = String::new();
    for (idx, point) in points.iter().enumerate() {
        out.push_str(&format_one(template, idx + 1, point));
    }
    out
}

/// Substitute placeholders for a single point.
///
/// Replacement happens in one left-to-right pass so substituted values are
/// never rescanned.
fn format_one(template: &str, index: usize, point: &Point) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = if tail.starts_with("{i}") {
            Some(index.to_string())
        } else if tail.starts_with("{x}") {
            Some(point.x.to_string())
        } else if tail.starts_with("{y}") {
            Some(point.y.to_string())
        } else {
            None
        };
        match value {
            Some(v) => {
                out.push_str(&v);
                rest = &tail[3..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
