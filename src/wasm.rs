//! Browser bindings.
//!
//! A thin wrapper over [`EngineCore`] for JavaScript hosts. Arguments are
//! primitives, reads come back as JSON strings, and rejected operations
//! surface as `"E_CODE: message"` errors.

use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::doc::{Coord, GroupId, Mode, SortKey, parse_group_choice};
use crate::engine::{Action, Axis, EngineCore};
use crate::error::{ErrorCode, GridError};
use crate::grid::GridSize;

fn js_error(err: &impl ErrorCode) -> JsValue {
    JsValue::from_str(&err.coded_message())
}

fn json_error(err: &serde_json::Error) -> JsValue {
    JsValue::from_str(&format!("E_SERIALIZE: {err}"))
}

/// A group id that must name a group; blank is rejected here.
fn group_id(raw: &str) -> Result<GroupId, JsValue> {
    match parse_group_choice(raw) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(js_error(&GridError::UnknownGroup(raw.to_string()))),
        Err(e) => Err(js_error(&e)),
    }
}

fn changed(action: &Action) -> bool {
    *action != Action::None
}

/// Point editor handle owned by the page.
#[wasm_bindgen]
pub struct GridEditor {
    core: EngineCore,
}

#[wasm_bindgen]
impl GridEditor {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let config = EditorConfig { grid: GridSize::new(width.into(), height.into()), ..EditorConfig::default() };
        Self { core: EngineCore::new(&config) }
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.core.set_viewport(width, height);
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let Some(mode) = Mode::parse(mode) else {
            return Err(JsValue::from_str(&format!("E_PARSE: invalid mode {mode}")));
        };
        self.core.set_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = setGridSize)]
    pub fn set_grid_size(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        self.core.graph.set_grid_size(width.into(), height.into()).map_err(|e| js_error(&e))?;
        Ok(())
    }

    // --- Input events ---

    /// Click inside the grid element at a pixel offset. Returns whether
    /// anything changed.
    #[wasm_bindgen(js_name = onGridClick)]
    pub fn on_grid_click(&mut self, offset_x: f64, offset_y: f64, additive: bool) -> Result<bool, JsValue> {
        let action = self.core.on_grid_click(offset_x, offset_y, additive).map_err(|e| js_error(&e))?;
        Ok(changed(&action))
    }

    #[wasm_bindgen(js_name = onPointClick)]
    pub fn on_point_click(&mut self, x: i32, y: i32, additive: bool) -> Result<bool, JsValue> {
        let at = Coord::new(x.into(), y.into());
        let action = self.core.on_point_click(at, additive).map_err(|e| js_error(&e))?;
        Ok(changed(&action))
    }

    /// Inline edit of one coordinate; `axis` is `"x"` or `"y"`.
    #[wasm_bindgen(js_name = editCoordinate)]
    pub fn edit_coordinate(&mut self, x: i32, y: i32, axis: &str, text: &str) -> Result<bool, JsValue> {
        let axis = match axis {
            "x" | "X" => Axis::X,
            "y" | "Y" => Axis::Y,
            other => return Err(JsValue::from_str(&format!("E_PARSE: invalid axis {other}"))),
        };
        let at = Coord::new(x.into(), y.into());
        let action = self.core.edit_coordinate(at, axis, text).map_err(|e| js_error(&e))?;
        Ok(changed(&action))
    }

    // --- Points / lines ---

    #[wasm_bindgen(js_name = addPoint)]
    pub fn add_point(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.core.graph.add_point(x.into(), y.into()).map_err(|e| js_error(&e))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = deletePoint)]
    pub fn delete_point(&mut self, x: i32, y: i32) -> bool {
        self.core.graph.delete_point(Coord::new(x.into(), y.into()))
    }

    #[wasm_bindgen(js_name = addLine)]
    pub fn add_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), JsValue> {
        let start = Coord::new(x1.into(), y1.into());
        let end = Coord::new(x2.into(), y2.into());
        self.core.graph.add_line(start, end).map_err(|e| js_error(&e))
    }

    // --- Groups ---

    /// Create a group and return its id.
    #[wasm_bindgen(js_name = addGroup)]
    pub fn add_group(&mut self, name: &str, color: Option<String>) -> Result<String, JsValue> {
        let id = self.core.graph.add_group(name, color.as_deref()).map_err(|e| js_error(&e))?;
        Ok(id.to_string())
    }

    #[wasm_bindgen(js_name = updateGroupColor)]
    pub fn update_group_color(&mut self, id: &str, color: &str) -> Result<bool, JsValue> {
        let id = group_id(id)?;
        Ok(self.core.graph.update_group_color(&id, color))
    }

    #[wasm_bindgen(js_name = renameGroup)]
    pub fn rename_group(&mut self, id: &str, name: &str) -> Result<(), JsValue> {
        let id = group_id(id)?;
        self.core.graph.rename_group(&id, name).map_err(|e| js_error(&e))
    }

    #[wasm_bindgen(js_name = deleteGroup)]
    pub fn delete_group(&mut self, id: &str) -> Result<bool, JsValue> {
        let id = group_id(id)?;
        Ok(self.core.graph.delete_group(&id))
    }

    /// Tag points with a group. `coords` is a JSON array of `{x, y}`; an
    /// absent or blank `group` untags. Returns how many points changed.
    #[wasm_bindgen(js_name = assignToGroup)]
    pub fn assign_to_group(&mut self, coords: &str, group: Option<String>) -> Result<usize, JsValue> {
        let coords: Vec<Coord> = serde_json::from_str(coords).map_err(|e| json_error(&e))?;
        let group = match group {
            Some(raw) => parse_group_choice(&raw).map_err(|e| js_error(&e))?,
            None => None,
        };
        self.core.graph.assign_to_group(&coords, group).map_err(|e| js_error(&e))
    }

    // --- Selection ---

    #[wasm_bindgen(js_name = togglePointSelection)]
    pub fn toggle_point_selection(&mut self, x: i32, y: i32, additive: bool) -> bool {
        self.core.graph.toggle_point_selection(Coord::new(x.into(), y.into()), additive)
    }

    #[wasm_bindgen(js_name = selectAllPoints)]
    pub fn select_all_points(&mut self) {
        self.core.graph.select_all_points();
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.core.graph.clear_selection();
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.core.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.core.redo()
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    // --- Reads ---

    /// Format points for copying; falls back to the configured template.
    #[wasm_bindgen(js_name = exportPoints)]
    #[must_use]
    pub fn export_points(&self, template: Option<String>) -> String {
        self.core.export(template.as_deref())
    }

    /// Full render model as JSON.
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.core.graph.view()).map_err(|e| json_error(&e))
    }

    /// Points in list order for `key` (`coordinate`, `timestamp` or `group`).
    #[wasm_bindgen(js_name = sortedPointsJson)]
    pub fn sorted_points_json(&self, key: &str) -> Result<String, JsValue> {
        let key = SortKey::parse(key).unwrap_or_default();
        serde_json::to_string(&self.core.graph.sorted_points(key)).map_err(|e| json_error(&e))
    }

    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.graph.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.core.graph.can_redo()
    }
}
