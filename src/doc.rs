//! Document model: points, lines, groups, and the small enums around them.
//!
//! These are plain value types. Points are identified by their `(x, y)`
//! coordinate rather than by reference, so every lookup in the manager goes
//! through [`Coord`]. Lines store endpoint coordinates, not copies of points;
//! the manager rewrites them when a point moves.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GridError;

/// Unique identifier for a point group.
pub type GroupId = Uuid;

/// Read a group choice sent as text by a host. Blank means "no group",
/// matching an empty `<select>` value.
///
/// # Errors
///
/// `UnknownGroup` when the text is not a group id.
pub fn parse_group_choice(raw: &str) -> Result<Option<GroupId>, GridError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match Uuid::parse_str(raw) {
        Ok(id) => Ok(Some(id)),
        Err(_) => Err(GridError::UnknownGroup(raw.to_string())),
    }
}

/// A grid cell address. Doubles as the identity of the point stored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A point placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Column index.
    pub x: i64,
    /// Row index.
    pub y: i64,
    /// Group this point is tagged with. A stale id reads as "no group".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Creation order key assigned by the manager.
    pub timestamp: u64,
}

impl Point {
    #[must_use]
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Copy of this point relocated to `to`, keeping group and timestamp.
    #[must_use]
    pub fn moved_to(&self, to: Coord) -> Self {
        Self { x: to.x, y: to.y, ..self.clone() }
    }

    /// Copy of this point with its group replaced.
    #[must_use]
    pub fn with_group(&self, group_id: Option<GroupId>) -> Self {
        Self { group_id, ..self.clone() }
    }
}

/// A straight connection between two point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub start: Coord,
    pub end: Coord,
}

impl Line {
    #[must_use]
    pub fn new(start: Coord, end: Coord) -> Self {
        Self { start, end }
    }

    /// Whether either endpoint sits on `at`.
    #[must_use]
    pub fn touches(&self, at: Coord) -> bool {
        self.start == at || self.end == at
    }

    /// Whether this line joins `a` and `b`, in either direction.
    #[must_use]
    pub fn connects(&self, a: Coord, b: Coord) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }

    /// Rewrite any endpoint at `from` to `to`.
    pub fn retarget(&mut self, from: Coord, to: Coord) {
        if self.start == from {
            self.start = to;
        }
        if self.end == from {
            self.end = to;
        }
    }
}

/// A named, colored tag assignable to points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointGroup {
    pub id: GroupId,
    pub name: String,
    /// Canonical lowercase `#rrggbb`.
    pub color: String,
}

/// How a host should interpret a click on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Clicks on empty cells create points; clicks on points draw lines.
    #[default]
    Add,
    /// Clicks on points toggle their selection.
    Select,
}

impl Mode {
    /// Parse the lowercase mode name used by hosts and scripts.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "select" => Some(Self::Select),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Select => "select",
        }
    }
}

/// Ordering for the point list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// By x, then y.
    Coordinate,
    /// By creation order.
    #[default]
    Timestamp,
    /// By group name; ungrouped points last, ties by creation order.
    Group,
}

impl SortKey {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "coordinate" => Some(Self::Coordinate),
            "timestamp" => Some(Self::Timestamp),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// Render-ready view of a point: selection and color resolved on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointView {
    #[serde(flatten)]
    pub point: Point,
    pub selected: bool,
    pub color: String,
}
