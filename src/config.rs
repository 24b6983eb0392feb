//! Editor defaults parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_EXPORT_TEMPLATE, DEFAULT_GRID_SIZE};
use crate::grid::GridSize;

pub const ENV_WIDTH: &str = "GRIDPLOT_WIDTH";
pub const ENV_HEIGHT: &str = "GRIDPLOT_HEIGHT";
pub const ENV_EXPORT_TEMPLATE: &str = "GRIDPLOT_EXPORT_TEMPLATE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub grid: GridSize,
    pub export_template: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { grid: GridSize::default(), export_template: DEFAULT_EXPORT_TEMPLATE.to_string() }
    }
}

impl EditorConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `GRIDPLOT_WIDTH`: default 200
    /// - `GRIDPLOT_HEIGHT`: default 200
    /// - `GRIDPLOT_EXPORT_TEMPLATE`: default `[coords{i}]`
    ///
    /// Unparsable numbers fall back to the default; values below 1 clamp to 1.
    #[must_use]
    pub fn from_env() -> Self {
        let width = env_parse_i64(ENV_WIDTH, DEFAULT_GRID_SIZE);
        let height = env_parse_i64(ENV_HEIGHT, DEFAULT_GRID_SIZE);
        let export_template = match std::env::var(ENV_EXPORT_TEMPLATE) {
            Ok(v) if !v.is_empty() => v,
            _ => DEFAULT_EXPORT_TEMPLATE.to_string(),
        };
        Self { grid: GridSize::new(width, height), export_template }
    }

    /// Layer explicit settings (command-line flags) over this config. Unset
    /// values keep what is already there; an empty template is ignored.
    #[must_use]
    pub fn with_overrides(mut self, width: Option<i64>, height: Option<i64>, template: Option<String>) -> Self {
        self.grid = GridSize::new(width.unwrap_or(self.grid.width), height.unwrap_or(self.grid.height));
        if let Some(template) = template.filter(|t| !t.is_empty()) {
            self.export_template = template;
        }
        self
    }
}

fn env_parse_i64(key: &str, default: i64) -> i64 {
    match std::env::var(key) {
        Ok(v) => v.trim().parse::<i64>().unwrap_or(default),
        Err(_) => default,
    }
}
