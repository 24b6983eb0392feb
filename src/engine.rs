//! Controls layer: turns host input into point graph operations.
//!
//! The host reports clicks as pixel offsets inside the rendered grid element
//! and coordinate edits as raw text. `EngineCore` resolves those against the
//! current mode and forwards them to the [`PointGraph`], returning an
//! [`Action`] describing what happened so the host knows what to redraw.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::config::EditorConfig;
use crate::doc::{Coord, Mode};
use crate::error::GridError;
use crate::export::format_points;
use crate::graph::PointGraph;
use crate::grid::Viewport;

/// Outcome of an input event, for the host to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing changed.
    None,
    PointAdded(Coord),
    PointUpdated { from: Coord, to: Coord },
    LineAdded { start: Coord, end: Coord },
    /// First endpoint of a line was picked.
    AnchorSet(Coord),
    /// A pending line was abandoned.
    AnchorCleared,
    SelectionChanged,
}

/// Which coordinate an inline edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Editor state that does not depend on any rendering surface.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub graph: PointGraph,
    pub viewport: Viewport,
    pub export_template: String,
    anchor: Option<Coord>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            graph: PointGraph::new(config.grid),
            viewport: Viewport::default(),
            export_template: config.export_template.clone(),
            anchor: None,
        }
    }

    // --- Viewport / mode ---

    /// Update the rendered size of the grid element in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// Switch mode; any half-drawn line is dropped.
    pub fn set_mode(&mut self, mode: Mode) {
        self.graph.set_mode(mode);
        self.anchor = None;
    }

    /// Pending line endpoint, if it still names a live point.
    #[must_use]
    pub fn anchor(&self) -> Option<Coord> {
        self.anchor.filter(|at| self.graph.point(*at).is_some())
    }

    // --- Input events ---

    /// Handle a click at a pixel offset inside the grid element.
    ///
    /// # Errors
    ///
    /// Propagates the graph error when the resulting operation is rejected.
    pub fn on_grid_click(&mut self, offset_x: f64, offset_y: f64, additive: bool) -> Result<Action, GridError> {
        let Some(at) = self.viewport.cell_at(self.graph.grid(), offset_x, offset_y) else {
            return Ok(Action::None);
        };
        if self.graph.point(at).is_some() {
            return self.on_point_click(at, additive);
        }
        match self.graph.mode() {
            Mode::Add => {
                self.graph.add_point(at.x, at.y)?;
                Ok(Action::PointAdded(at))
            }
            Mode::Select => Ok(Action::None),
        }
    }

    /// Handle a click on an existing point.
    ///
    /// In select mode this toggles selection. In add mode the first click
    /// picks a line anchor and a second click on another point connects them.
    ///
    /// # Errors
    ///
    /// Propagates `add_line` failures such as `DuplicateLine`.
    pub fn on_point_click(&mut self, at: Coord, additive: bool) -> Result<Action, GridError> {
        if self.graph.point(at).is_none() {
            return Ok(Action::None);
        }
        match self.graph.mode() {
            Mode::Select => {
                self.graph.toggle_point_selection(at, additive);
                Ok(Action::SelectionChanged)
            }
            Mode::Add => match self.anchor() {
                None => {
                    self.anchor = Some(at);
                    Ok(Action::AnchorSet(at))
                }
                Some(start) if start == at => {
                    self.anchor = None;
                    Ok(Action::AnchorCleared)
                }
                Some(start) => {
                    self.anchor = None;
                    self.graph.add_line(start, at)?;
                    Ok(Action::LineAdded { start, end: at })
                }
            },
        }
    }

    /// Apply an inline edit of one coordinate of the point at `at`.
    ///
    /// Text that does not start with an integer is ignored, leaving the point
    /// as it was.
    ///
    /// # Errors
    ///
    /// Propagates `update_point` failures.
    pub fn edit_coordinate(&mut self, at: Coord, axis: Axis, text: &str) -> Result<Action, GridError> {
        let Some(value) = parse_int_prefix(text) else {
            tracing::trace!(%at, text, "coordinate edit ignored: not a number");
            return Ok(Action::None);
        };
        let point = self.graph.point(at).ok_or(GridError::PointNotFound { x: at.x, y: at.y })?;
        let to = match axis {
            Axis::X => Coord::new(value, at.y),
            Axis::Y => Coord::new(at.x, value),
        };
        let new = point.moved_to(to);
        if !self.graph.update_point(at, new)? {
            return Ok(Action::None);
        }
        if self.anchor == Some(at) {
            self.anchor = Some(to);
        }
        Ok(Action::PointUpdated { from: at, to })
    }

    // --- History passthrough ---

    pub fn undo(&mut self) -> bool {
        self.graph.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.graph.redo()
    }

    /// Wipe points, lines and history, and drop any pending line.
    pub fn reset(&mut self) {
        self.graph.reset_grid();
        self.anchor = None;
    }

    // --- Export ---

    /// Format the current points with `template`, or the configured template.
    #[must_use]
    pub fn export(&self, template: Option<&str>) -> String {
        format_points(self.graph.points(), template.unwrap_or(&self.export_template))
    }
}

/// Read a leading base-10 integer the way an HTML number field's text is
/// usually interpreted: optional whitespace and sign, then digits. Trailing
/// junk is ignored; no digits means no value.
#[must_use]
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let magnitude: i64 = match digits[..end].parse() {
        Ok(v) => v,
        Err(_) => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}
