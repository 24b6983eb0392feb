//! Grid point editor core.
//!
//! Holds the state behind a browser grid editor: points on an integer grid,
//! lines between them, named color groups, a selection, an add/select mode and
//! linear undo/redo over point and line edits. The same core is exposed to
//! JavaScript through [`wasm`] and to the terminal through the `gridplot`
//! binary, which reads [`script`] commands.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`graph`] | `PointGraph`, the state manager and its read model |
//! | [`doc`] | Point, line, group, mode and sort key types |
//! | [`history`] | Snapshot log behind undo/redo |
//! | [`grid`] | Grid bounds and pixel to cell conversion |
//! | [`engine`] | `EngineCore`: clicks, line drawing and inline edits |
//! | [`export`] | Template formatting of the point list |
//! | [`color`] | Hex color parsing and the group palette |
//! | [`script`] | Text command parser and executor |
//! | [`config`] | Defaults from environment variables |
//! | [`error`] | `GridError` and its stable codes |
//! | [`wasm`] | `wasm-bindgen` wrapper for browser hosts |
//! | [`consts`] | Shared defaults |

pub mod color;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod export;
pub mod graph;
pub mod grid;
pub mod history;
pub mod script;
pub mod wasm;
