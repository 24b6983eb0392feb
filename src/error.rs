//! Errors returned by point graph mutations, and the code trait shared by
//! every error type in the crate.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Grepable error code carried next to the message.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    /// `"E_CODE: message"`, the form handed to hosts.
    fn coded_message(&self) -> String {
        format!("{}: {self}", self.error_code())
    }
}

/// Error returned by [`crate::graph::PointGraph`] operations.
///
/// Every variant is recoverable: the manager validates before applying, so
/// state is untouched when one of these comes back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Coordinate is negative or falls outside the current grid bounds.
    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: i64, y: i64 },
    /// Another point already occupies this coordinate.
    #[error("a point already exists at ({x}, {y})")]
    DuplicatePoint { x: i64, y: i64 },
    /// Group name is empty after trimming.
    #[error("group name must not be empty")]
    InvalidName,
    /// Group id does not name a live group.
    #[error("unknown group: {0}")]
    UnknownGroup(String),
    /// No point exists at this coordinate.
    #[error("no point at ({x}, {y})")]
    PointNotFound { x: i64, y: i64 },
    /// A line would connect a point to itself.
    #[error("cannot connect ({x}, {y}) to itself")]
    SelfLoop { x: i64, y: i64 },
    /// The two points are already connected.
    #[error("points are already connected")]
    DuplicateLine,
}

impl ErrorCode for GridError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate { .. } => "E_INVALID_COORDINATE",
            Self::DuplicatePoint { .. } => "E_DUPLICATE_POINT",
            Self::InvalidName => "E_INVALID_NAME",
            Self::UnknownGroup(_) => "E_UNKNOWN_GROUP",
            Self::PointNotFound { .. } => "E_POINT_NOT_FOUND",
            Self::SelfLoop { .. } => "E_SELF_LOOP",
            Self::DuplicateLine => "E_DUPLICATE_LINE",
        }
    }
}
