//! Shared constants for the gridplot crate.

// ── Grid ────────────────────────────────────────────────────────

/// Default number of cells along each axis of a fresh grid.
pub const DEFAULT_GRID_SIZE: i64 = 200;

/// Smallest allowed grid dimension.
pub const MIN_GRID_SIZE: i64 = 1;

// ── Colors ──────────────────────────────────────────────────────

/// Fill used for points that belong to no (live) group.
pub const DEFAULT_POINT_COLOR: &str = "#3b82f6";

/// Colors handed out to new groups, cycled by group count.
pub const GROUP_PALETTE: [&str; 5] = ["#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#6366f1"];

// ── Export ──────────────────────────────────────────────────────

/// Template used when the caller does not supply one.
pub const DEFAULT_EXPORT_TEMPLATE: &str = "[coords{i}]";
