//! Line-oriented command language for driving an [`EngineCore`] from text.
//!
//! Used by the `gridplot` binary as a stand-in for the browser controls. One
//! command per line; blank lines and `#` comments are skipped. Parsing is pure
//! and separate from execution so both halves can be tested alone.
//!
//! ```text
//! add 1 1
//! group add Roads #ef4444
//! assign 1 1 Roads
//! export [{i}:{x},{y}]
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use uuid::Uuid;

use crate::color::parse_hex_rgb;
use crate::doc::{Coord, GroupId, Mode, SortKey};
use crate::engine::{Action, Axis, EngineCore};
use crate::error::{ErrorCode, GridError};

/// Error from parsing or running a script line.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),
    #[error("invalid number for `{arg}`: {value}")]
    InvalidNumber { arg: &'static str, value: String },
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
    #[error("invalid mode: {0} (expected add or select)")]
    InvalidMode(String),
    #[error("invalid sort key: {0} (expected coordinate, timestamp or group)")]
    InvalidSortKey(String),
    #[error("invalid axis: {0} (expected x or y)")]
    InvalidAxis(String),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("failed to serialize state: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for ScriptError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Grid(e) => e.error_code(),
            Self::Json(_) => "E_SERIALIZE",
            _ => "E_PARSE",
        }
    }
}

/// A group named either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef(pub String);

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Coord),
    Delete(Coord),
    Move { from: Coord, to: Coord },
    Edit { at: Coord, axis: Axis, text: String },
    Line { start: Coord, end: Coord },
    Click { x: f64, y: f64, additive: bool },
    Resize { width: i64, height: i64 },
    Viewport { width: f64, height: f64 },
    GroupAdd { name: String, color: Option<String> },
    GroupColor { group: GroupRef, color: String },
    GroupRename { group: GroupRef, name: String },
    GroupDelete(GroupRef),
    Assign { at: Coord, group: Option<GroupRef> },
    Select { at: Coord, additive: bool },
    SelectAll,
    SelectNone,
    SetMode(Mode),
    Undo,
    Redo,
    Reset,
    List(SortKey),
    Export(Option<String>),
    Dump,
}

/// Parse one line. Returns `Ok(None)` for blank lines and comments.
///
/// # Errors
///
/// Any `ScriptError` parse variant describing what was wrong with the line.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim_end().is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = split_word(line);
    let args: Vec<&str> = rest.split_whitespace().collect();

    let cmd = match head.to_ascii_lowercase().as_str() {
        "add" => Command::Add(coord_at(&args, 0)?),
        "delete" | "del" => Command::Delete(coord_at(&args, 0)?),
        "move" => Command::Move { from: coord_at(&args, 0)?, to: coord_at(&args, 2)? },
        "edit" => {
            let at = coord_at(&args, 0)?;
            let raw_axis = *args.get(2).ok_or(ScriptError::MissingArgument("axis"))?;
            let axis = match raw_axis.to_ascii_lowercase().as_str() {
                "x" => Axis::X,
                "y" => Axis::Y,
                _ => return Err(ScriptError::InvalidAxis(raw_axis.to_string())),
            };
            let text = args.get(3..).map(|t| t.join(" ")).unwrap_or_default();
            Command::Edit { at, axis, text }
        }
        "line" => Command::Line { start: coord_at(&args, 0)?, end: coord_at(&args, 2)? },
        "click" => Command::Click {
            x: float_arg(&args, 0, "px")?,
            y: float_arg(&args, 1, "py")?,
            additive: flag_at(&args, 2, "add")?,
        },
        "resize" => Command::Resize { width: int_arg(&args, 0, "width")?, height: int_arg(&args, 1, "height")? },
        "viewport" => Command::Viewport {
            width: float_arg(&args, 0, "width")?,
            height: float_arg(&args, 1, "height")?,
        },
        "group" => parse_group(rest)?,
        "assign" => Command::Assign {
            at: coord_at(&args, 0)?,
            group: args.get(2..).filter(|t| !t.is_empty()).map(|t| GroupRef(t.join(" "))),
        },
        "select" => match args.first().copied() {
            Some("all") => Command::SelectAll,
            Some("none") => Command::SelectNone,
            _ => Command::Select { at: coord_at(&args, 0)?, additive: flag_at(&args, 2, "add")? },
        },
        "mode" => {
            let raw = *args.first().ok_or(ScriptError::MissingArgument("mode"))?;
            Command::SetMode(Mode::parse(raw).ok_or_else(|| ScriptError::InvalidMode(raw.to_string()))?)
        }
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "reset" => Command::Reset,
        "list" => match args.first() {
            None => Command::List(SortKey::default()),
            Some(raw) => Command::List(SortKey::parse(raw).ok_or_else(|| ScriptError::InvalidSortKey((*raw).to_string()))?),
        },
        "export" => {
            // the template keeps its own spacing; only the separator goes
            let raw = &line[head.len()..];
            let template = raw.strip_prefix(char::is_whitespace).unwrap_or(raw);
            Command::Export((!template.trim().is_empty()).then(|| template.to_string()))
        }
        "dump" => Command::Dump,
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

fn parse_group(rest: &str) -> Result<Command, ScriptError> {
    let (sub, rest) = split_word(rest);
    let args: Vec<&str> = rest.split_whitespace().collect();
    match sub.to_ascii_lowercase().as_str() {
        "add" => {
            let (name, color) = match args.split_last() {
                Some((last, init)) if !init.is_empty() && parse_hex_rgb(last).is_some() => {
                    (init.join(" "), Some((*last).to_string()))
                }
                _ => (args.join(" "), None),
            };
            Ok(Command::GroupAdd { name, color })
        }
        "color" => {
            let group = group_at(&args, 0)?;
            let color = args.get(1).ok_or(ScriptError::MissingArgument("color"))?;
            Ok(Command::GroupColor { group, color: (*color).to_string() })
        }
        "rename" => {
            let group = group_at(&args, 0)?;
            Ok(Command::GroupRename { group, name: args.get(1..).map(|t| t.join(" ")).unwrap_or_default() })
        }
        "delete" | "del" => Ok(Command::GroupDelete(group_at(&args, 0)?)),
        "" => Err(ScriptError::MissingArgument("group subcommand")),
        other => Err(ScriptError::UnknownCommand(format!("group {other}"))),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim()),
        None => (s, ""),
    }
}

fn int_arg(args: &[&str], idx: usize, name: &'static str) -> Result<i64, ScriptError> {
    let raw = args.get(idx).ok_or(ScriptError::MissingArgument(name))?;
    raw.parse()
        .map_err(|_| ScriptError::InvalidNumber { arg: name, value: (*raw).to_string() })
}

fn float_arg(args: &[&str], idx: usize, name: &'static str) -> Result<f64, ScriptError> {
    let raw = args.get(idx).ok_or(ScriptError::MissingArgument(name))?;
    raw.parse()
        .map_err(|_| ScriptError::InvalidNumber { arg: name, value: (*raw).to_string() })
}

fn coord_at(args: &[&str], idx: usize) -> Result<Coord, ScriptError> {
    Ok(Coord::new(int_arg(args, idx, "x")?, int_arg(args, idx + 1, "y")?))
}

fn flag_at(args: &[&str], idx: usize, flag: &str) -> Result<bool, ScriptError> {
    match args.get(idx) {
        None => Ok(false),
        Some(raw) if raw.eq_ignore_ascii_case(flag) => Ok(true),
        Some(raw) => Err(ScriptError::UnexpectedArgument((*raw).to_string())),
    }
}

fn group_at(args: &[&str], idx: usize) -> Result<GroupRef, ScriptError> {
    args.get(idx)
        .map(|raw| GroupRef((*raw).to_string()))
        .ok_or(ScriptError::MissingArgument("group"))
}

/// Resolve a group reference against live groups: exact id first, then name.
fn resolve_group(engine: &EngineCore, group: &GroupRef) -> Option<GroupId> {
    if let Ok(id) = Uuid::parse_str(&group.0) {
        if engine.graph.group(&id).is_some() {
            return Some(id);
        }
    }
    engine.graph.groups().iter().find(|g| g.name == group.0).map(|g| g.id)
}

fn require_group(engine: &EngineCore, group: &GroupRef) -> Result<GroupId, GridError> {
    resolve_group(engine, group).ok_or_else(|| GridError::UnknownGroup(group.0.clone()))
}

/// Run one command and return the text to show the user.
///
/// # Errors
///
/// `ScriptError::Grid` when the editor rejects the operation.
pub fn execute(engine: &mut EngineCore, cmd: Command) -> Result<String, ScriptError> {
    let out = match cmd {
        Command::Add(at) => {
            engine.graph.add_point(at.x, at.y)?;
            format!("added {at}")
        }
        Command::Delete(at) => {
            if engine.graph.delete_point(at) {
                format!("deleted {at}")
            } else {
                format!("no point at {at}")
            }
        }
        Command::Move { from, to } => {
            let point = engine.graph.point(from).ok_or(GridError::PointNotFound { x: from.x, y: from.y })?;
            let new = point.moved_to(to);
            if engine.graph.update_point(from, new)? {
                format!("moved {from} -> {to}")
            } else {
                "unchanged".to_string()
            }
        }
        Command::Edit { at, axis, text } => describe(&engine.edit_coordinate(at, axis, &text)?),
        Command::Line { start, end } => {
            engine.graph.add_line(start, end)?;
            format!("connected {start} - {end}")
        }
        Command::Click { x, y, additive } => describe(&engine.on_grid_click(x, y, additive)?),
        Command::Resize { width, height } => {
            let grid = engine.graph.set_grid_size(width, height)?;
            format!("grid {}x{}", grid.width, grid.height)
        }
        Command::Viewport { width, height } => {
            engine.set_viewport(width, height);
            format!("viewport {width}x{height}")
        }
        Command::GroupAdd { name, color } => {
            let id = engine.graph.add_group(&name, color.as_deref())?;
            let g = engine.graph.group(&id).ok_or_else(|| GridError::UnknownGroup(id.to_string()))?;
            format!("group {} {} {}", g.id, g.name, g.color)
        }
        Command::GroupColor { group, color } => {
            let recolored = match resolve_group(engine, &group) {
                Some(id) => engine.graph.update_group_color(&id, &color),
                None => false,
            };
            let msg = if recolored { "recolored" } else { "unchanged" };
            msg.to_string()
        }
        Command::GroupRename { group, name } => {
            let id = require_group(engine, &group)?;
            engine.graph.rename_group(&id, &name)?;
            "renamed".to_string()
        }
        Command::GroupDelete(group) => {
            let deleted = match resolve_group(engine, &group) {
                Some(id) => engine.graph.delete_group(&id),
                None => false,
            };
            let msg = if deleted { "deleted group" } else { "no such group" };
            msg.to_string()
        }
        Command::Assign { at, group } => {
            let group_id = match group {
                Some(g) => Some(require_group(engine, &g)?),
                None => None,
            };
            let changed = engine.graph.assign_to_group(&[at], group_id)?;
            format!("assigned {changed} point(s)")
        }
        Command::Select { at, additive } => {
            engine.graph.toggle_point_selection(at, additive);
            selection_summary(engine)
        }
        Command::SelectAll => {
            engine.graph.select_all_points();
            selection_summary(engine)
        }
        Command::SelectNone => {
            engine.graph.clear_selection();
            selection_summary(engine)
        }
        Command::SetMode(mode) => {
            engine.set_mode(mode);
            format!("mode {}", mode.as_str())
        }
        Command::Undo => {
            let moved = engine.undo();
            let msg = if moved { "undo" } else { "nothing to undo" };
            msg.to_string()
        }
        Command::Redo => {
            let moved = engine.redo();
            let msg = if moved { "redo" } else { "nothing to redo" };
            msg.to_string()
        }
        Command::Reset => {
            engine.reset();
            "reset".to_string()
        }
        Command::List(key) => list_points(engine, key),
        Command::Export(template) => engine.export(template.as_deref()),
        Command::Dump => serde_json::to_string_pretty(&engine.graph.view())?,
    };
    Ok(out)
}

fn describe(action: &Action) -> String {
    match action {
        Action::None => "no change".to_string(),
        Action::PointAdded(at) => format!("added {at}"),
        Action::PointUpdated { from, to } => format!("moved {from} -> {to}"),
        Action::LineAdded { start, end } => format!("connected {start} - {end}"),
        Action::AnchorSet(at) => format!("line from {at}"),
        Action::AnchorCleared => "line cancelled".to_string(),
        Action::SelectionChanged => "selection changed".to_string(),
    }
}

fn selection_summary(engine: &EngineCore) -> String {
    let selected = engine.graph.selected_points();
    if selected.is_empty() {
        return "selected: none".to_string();
    }
    let list: Vec<String> = selected.iter().map(|p| p.coord().to_string()).collect();
    format!("selected: {}", list.join(" "))
}

fn list_points(engine: &EngineCore, key: SortKey) -> String {
    let graph = &engine.graph;
    let mut out = format!("points ({})", graph.points().len());
    for (idx, point) in graph.sorted_points(key).into_iter().enumerate() {
        out.push_str(&format!("\n{:>3}. {}", idx + 1, point.coord()));
        if let Some(group) = graph.group_of(point) {
            out.push_str(&format!(" [{}]", group.name));
        }
        if graph.is_selected(point.coord()) {
            out.push_str(" *");
        }
    }
    out
}
