//! Sort order of the recently-updated-files widget.

#[cfg(test)]
#[path = "recent_test.rs"]
mod recent_test;

use crate::net::error::ApiError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    /// Value of the `sort` query parameter.
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::NewestFirst => "desc",
            Self::OldestFirst => "asc",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::NewestFirst => Self::OldestFirst,
            Self::OldestFirst => Self::NewestFirst,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NewestFirst => "Newest First",
            Self::OldestFirst => "Oldest First",
        }
    }
}

/// Inline error text for a failed recent-files request.
#[must_use]
pub fn recent_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Transport(_) => "Error connecting to server".to_owned(),
        other => other.to_string(),
    }
}
