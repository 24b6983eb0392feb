//! Point graph state manager.
//!
//! `PointGraph` owns every piece of editor state: points, lines, groups, the
//! selection, the interaction mode, the grid bounds and the undo log. Hosts
//! hold one instance and drive it through the methods below; nothing here is
//! global.
//!
//! DESIGN
//! ======
//! - Points are keyed by coordinate. The selection is a set of coordinates and
//!   is the only record of which points are selected. It is not recorded in
//!   the undo log; undo/redo carry it along with each point's timestamp,
//!   which never changes once assigned.
//! - Point and line edits are recorded in the undo log. Group edits are not:
//!   undo can bring back a `group_id` whose group is gone, and every read
//!   treats such an id as "no group".
//! - Fallible operations validate everything up front and only then mutate.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::color::{normalize_hex_color, palette_color};
use crate::consts::DEFAULT_POINT_COLOR;
use crate::doc::{Coord, GroupId, Line, Mode, Point, PointGroup, PointView, SortKey};
use crate::error::GridError;
use crate::grid::GridSize;
use crate::history::{History, Snapshot};

/// Serializable read model handed to renderers.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView<'a> {
    pub points: Vec<PointView>,
    pub lines: &'a [Line],
    pub groups: &'a [PointGroup],
    pub mode: Mode,
    pub grid: GridSize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// In-memory editor state with linear undo/redo.
#[derive(Debug, Clone)]
pub struct PointGraph {
    points: Vec<Point>,
    lines: Vec<Line>,
    groups: Vec<PointGroup>,
    selected: HashSet<Coord>,
    mode: Mode,
    grid: GridSize,
    history: History<Snapshot>,
    next_timestamp: u64,
}

impl Default for PointGraph {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}

impl PointGraph {
    /// Create an empty graph over a grid of the given size.
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        Self {
            points: Vec::new(),
            lines: Vec::new(),
            groups: Vec::new(),
            selected: HashSet::new(),
            mode: Mode::default(),
            grid,
            history: History::default(),
            next_timestamp: 0,
        }
    }

    // --- Points ---

    /// Place a new point at `(x, y)`.
    ///
    /// # Errors
    ///
    /// `InvalidCoordinate` when off the grid, `DuplicatePoint` when occupied.
    pub fn add_point(&mut self, x: i64, y: i64) -> Result<Coord, GridError> {
        let at = Coord::new(x, y);
        self.check_bounds(at)?;
        if self.position(at).is_some() {
            return Err(GridError::DuplicatePoint { x, y });
        }

        let timestamp = self.next_timestamp;
        self.next_timestamp += 1;
        self.points.push(Point { x, y, group_id: None, timestamp });
        self.commit();
        tracing::debug!(x, y, timestamp, "point added");
        Ok(at)
    }

    /// Remove the point at `at` along with its lines and selection entry.
    ///
    /// Returns `false` (and records nothing) when no point is there.
    pub fn delete_point(&mut self, at: Coord) -> bool {
        let Some(idx) = self.position(at) else {
            tracing::trace!(%at, "delete ignored: no point");
            return false;
        };
        self.points.remove(idx);
        self.lines.retain(|line| !line.touches(at));
        self.selected.remove(&at);
        self.commit();
        tracing::debug!(%at, "point deleted");
        true
    }

    /// Replace the point at `old` with `new`, dragging line endpoints and the
    /// selection along. Returns `false` when `new` equals the current point.
    ///
    /// # Errors
    ///
    /// `PointNotFound` when nothing is at `old`; `InvalidCoordinate` when
    /// `new` is off the grid; `DuplicatePoint` when another point occupies
    /// `new`; `UnknownGroup` when `new` switches to a group that does not exist.
    pub fn update_point(&mut self, old: Coord, new: Point) -> Result<bool, GridError> {
        let idx = self.position(old).ok_or(GridError::PointNotFound { x: old.x, y: old.y })?;
        // the timestamp is the point's identity across undo/redo
        let new = Point { timestamp: self.points[idx].timestamp, ..new };
        let to = new.coord();
        self.check_bounds(to)?;
        if to != old && self.position(to).is_some() {
            return Err(GridError::DuplicatePoint { x: to.x, y: to.y });
        }
        if let Some(group_id) = new.group_id {
            if self.points[idx].group_id != Some(group_id) && self.group(&group_id).is_none() {
                return Err(GridError::UnknownGroup(group_id.to_string()));
            }
        }
        if self.points[idx] == new {
            return Ok(false);
        }

        self.points[idx] = new;
        if to != old {
            for line in &mut self.lines {
                line.retarget(old, to);
            }
            if self.selected.remove(&old) {
                self.selected.insert(to);
            }
        }
        self.commit();
        tracing::debug!(from = %old, to = %to, "point updated");
        Ok(true)
    }

    /// Clear points, lines, selection and the undo log. Not undoable.
    ///
    /// Groups, mode and grid size are kept.
    pub fn reset_grid(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.selected.clear();
        self.history.reset(Snapshot::default());
        tracing::debug!("grid reset");
    }

    // --- Lines ---

    /// Connect two existing points.
    ///
    /// # Errors
    ///
    /// `PointNotFound` when either end is missing, `SelfLoop` when both ends
    /// are the same point, `DuplicateLine` when they are already connected.
    pub fn add_line(&mut self, start: Coord, end: Coord) -> Result<(), GridError> {
        for at in [start, end] {
            if self.position(at).is_none() {
                return Err(GridError::PointNotFound { x: at.x, y: at.y });
            }
        }
        if start == end {
            return Err(GridError::SelfLoop { x: start.x, y: start.y });
        }
        if self.lines.iter().any(|line| line.connects(start, end)) {
            return Err(GridError::DuplicateLine);
        }

        self.lines.push(Line::new(start, end));
        self.commit();
        tracing::debug!(%start, %end, "line added");
        Ok(())
    }

    // --- Groups ---

    /// Create a group. A missing or unparsable color takes the next palette entry.
    ///
    /// # Errors
    ///
    /// `InvalidName` when `name` is blank.
    pub fn add_group(&mut self, name: &str, color: Option<&str>) -> Result<GroupId, GridError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GridError::InvalidName);
        }
        let color = color
            .and_then(normalize_hex_color)
            .unwrap_or_else(|| palette_color(self.groups.len()).to_string());

        let id = Uuid::new_v4();
        tracing::debug!(%id, name, %color, "group added");
        self.groups.push(PointGroup { id, name: name.to_string(), color });
        Ok(id)
    }

    /// Recolor a group in place. Returns `false` for an unknown id or a color
    /// that is not `#rgb`/`#rrggbb`.
    pub fn update_group_color(&mut self, id: &GroupId, color: &str) -> bool {
        let Some(color) = normalize_hex_color(color) else {
            tracing::trace!(%id, color, "recolor ignored: not a hex color");
            return false;
        };
        let Some(group) = self.groups.iter_mut().find(|g| g.id == *id) else {
            tracing::trace!(%id, "recolor ignored: unknown group");
            return false;
        };
        tracing::debug!(%id, %color, "group recolored");
        group.color = color;
        true
    }

    /// Rename a group.
    ///
    /// # Errors
    ///
    /// `InvalidName` when `name` is blank, `UnknownGroup` for an unknown id.
    pub fn rename_group(&mut self, id: &GroupId, name: &str) -> Result<(), GridError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GridError::InvalidName);
        }
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == *id)
            .ok_or_else(|| GridError::UnknownGroup(id.to_string()))?;
        group.name = name.to_string();
        tracing::debug!(%id, name, "group renamed");
        Ok(())
    }

    /// Remove a group and untag its members. Returns `false` for an unknown id.
    pub fn delete_group(&mut self, id: &GroupId) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != *id);
        if self.groups.len() == before {
            tracing::trace!(%id, "delete ignored: unknown group");
            return false;
        }
        for point in &mut self.points {
            if point.group_id == Some(*id) {
                point.group_id = None;
            }
        }
        tracing::debug!(%id, "group deleted");
        true
    }

    /// Tag every point at `coords` with `group_id` (`None` untags).
    ///
    /// Returns how many points changed; one undo step covers them all.
    ///
    /// # Errors
    ///
    /// `UnknownGroup` when `group_id` names no group.
    pub fn assign_to_group(&mut self, coords: &[Coord], group_id: Option<GroupId>) -> Result<usize, GridError> {
        if let Some(id) = group_id {
            if self.group(&id).is_none() {
                return Err(GridError::UnknownGroup(id.to_string()));
            }
        }

        let targets: HashSet<Coord> = coords.iter().copied().collect();
        let mut changed = 0;
        for point in &mut self.points {
            if targets.contains(&point.coord()) && point.group_id != group_id {
                point.group_id = group_id;
                changed += 1;
            }
        }
        if changed > 0 {
            self.commit();
            tracing::debug!(changed, group = ?group_id, "points assigned");
        }
        Ok(changed)
    }

    // --- Selection ---

    /// Select a point. Non-additive selects exactly this point; additive flips
    /// it and leaves the rest alone. Returns `false` when no point is there.
    pub fn toggle_point_selection(&mut self, at: Coord, additive: bool) -> bool {
        if self.position(at).is_none() {
            return false;
        }
        if additive {
            if !self.selected.remove(&at) {
                self.selected.insert(at);
            }
        } else {
            self.selected.clear();
            self.selected.insert(at);
        }
        true
    }

    pub fn select_all_points(&mut self) {
        self.selected = self.points.iter().map(Point::coord).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_selected(&self, at: Coord) -> bool {
        self.selected.contains(&at)
    }

    /// Selected points in list order.
    #[must_use]
    pub fn selected_points(&self) -> Vec<&Point> {
        self.points.iter().filter(|p| self.selected.contains(&p.coord())).collect()
    }

    // --- Mode / grid ---

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Resize the grid. Dimensions below 1 are clamped.
    ///
    /// # Errors
    ///
    /// `InvalidCoordinate` naming the first point the new size would exclude.
    pub fn set_grid_size(&mut self, width: i64, height: i64) -> Result<GridSize, GridError> {
        let grid = GridSize::new(width, height);
        if let Some(p) = self.points.iter().find(|p| !grid.contains(p.coord())) {
            return Err(GridError::InvalidCoordinate { x: p.x, y: p.y });
        }
        self.grid = grid;
        tracing::debug!(width = grid.width, height = grid.height, "grid resized");
        Ok(grid)
    }

    // --- Undo / redo ---

    /// Step back one edit. Returns `false` at the start of the log.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        tracing::debug!(index = self.history.index(), "undo");
        true
    }

    /// Step forward one edit. Returns `false` at the end of the log.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        tracing::debug!(index = self.history.index(), "redo");
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Reads ---

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn groups(&self) -> &[PointGroup] {
        &self.groups
    }

    #[must_use]
    pub fn point(&self, at: Coord) -> Option<&Point> {
        self.points.iter().find(|p| p.coord() == at)
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&PointGroup> {
        self.groups.iter().find(|g| g.id == *id)
    }

    /// The live group a point belongs to, if any.
    #[must_use]
    pub fn group_of(&self, point: &Point) -> Option<&PointGroup> {
        point.group_id.as_ref().and_then(|id| self.group(id))
    }

    /// Display color: the group's color, or the default point color.
    #[must_use]
    pub fn point_color(&self, point: &Point) -> &str {
        self.group_of(point).map_or(DEFAULT_POINT_COLOR, |g| g.color.as_str())
    }

    /// Points ordered for the list view.
    #[must_use]
    pub fn sorted_points(&self, key: SortKey) -> Vec<&Point> {
        let mut out: Vec<&Point> = self.points.iter().collect();
        match key {
            SortKey::Coordinate => out.sort_by_key(|p| p.coord()),
            SortKey::Timestamp => out.sort_by_key(|p| p.timestamp),
            SortKey::Group => out.sort_by(|a, b| {
                let name_a = self.group_of(a).map(|g| g.name.as_str());
                let name_b = self.group_of(b).map(|g| g.name.as_str());
                match (name_a, name_b) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
                .then_with(|| a.timestamp.cmp(&b.timestamp))
            }),
        }
        out
    }

    /// Points whose live group is `group_id`. `None`, or an id with no live
    /// group, selects the ungrouped points.
    #[must_use]
    pub fn points_in_group(&self, group_id: Option<&GroupId>) -> Vec<&Point> {
        let wanted = group_id.and_then(|id| self.group(id)).map(|g| g.id);
        self.points
            .iter()
            .filter(|p| self.group_of(p).map(|g| g.id) == wanted)
            .collect()
    }

    /// Points with selection and color resolved.
    #[must_use]
    pub fn point_views(&self) -> Vec<PointView> {
        self.points
            .iter()
            .map(|p| PointView {
                point: p.clone(),
                selected: self.selected.contains(&p.coord()),
                color: self.point_color(p).to_string(),
            })
            .collect()
    }

    /// Everything a renderer needs in one serializable value.
    #[must_use]
    pub fn view(&self) -> GraphView<'_> {
        GraphView {
            points: self.point_views(),
            lines: &self.lines,
            groups: &self.groups,
            mode: self.mode,
            grid: self.grid,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    // --- Internals ---

    fn position(&self, at: Coord) -> Option<usize> {
        self.points.iter().position(|p| p.coord() == at)
    }

    fn check_bounds(&self, at: Coord) -> Result<(), GridError> {
        if self.grid.contains(at) {
            Ok(())
        } else {
            Err(GridError::InvalidCoordinate { x: at.x, y: at.y })
        }
    }

    fn commit(&mut self) {
        self.history.record(Snapshot { points: self.points.clone(), lines: self.lines.clone() });
    }

    /// Swap in a snapshot. Selection follows points by timestamp, so a point
    /// moved back by undo stays selected; points that are gone drop out.
    fn restore(&mut self, snapshot: Snapshot) {
        let picked: HashSet<u64> = self
            .points
            .iter()
            .filter(|p| self.selected.contains(&p.coord()))
            .map(|p| p.timestamp)
            .collect();
        self.points = snapshot.points;
        self.lines = snapshot.lines;
        self.selected = self
            .points
            .iter()
            .filter(|p| picked.contains(&p.timestamp))
            .map(Point::coord)
            .collect();
    }
}
