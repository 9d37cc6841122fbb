//! Group categories.
//!
//! The three fixed class levels that partition a day's teaching slots.
//! The set is closed: schedule layout, validation messages, and statistics
//! all iterate [`Group::ALL`] in canonical order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A class level (group category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Beginner-level classes.
    Beginners,
    /// Children's classes.
    Children,
    /// Adult classes.
    Adults,
}

impl Group {
    /// All groups in canonical order (beginners, children, adults).
    pub const ALL: [Group; 3] = [Group::Beginners, Group::Children, Group::Adults];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Group::Beginners => "Beginners",
            Group::Children => "Children",
            Group::Adults => "Adults",
        }
    }

    /// Wire tag (the lowercase form used in persisted snapshots).
    pub fn tag(&self) -> &'static str {
        match self {
            Group::Beginners => "beginners",
            Group::Children => "children",
            Group::Adults => "adults",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
