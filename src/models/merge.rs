//! Day-level merge state.
//!
//! Adjacent group slots on a day can be combined into one shared teaching
//! block. The merge tag is stored once per day; everything else (which
//! group is absorbed, how many columns the block spans, its display label)
//! is derived from the tag, never stored redundantly.

use serde::{Deserialize, Serialize};

use super::Group;

/// How a day's three group slots are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeTag {
    /// No merge; three independent slots.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Children absorbed into the beginners block.
    #[serde(rename = "beg-chi")]
    BegChi,
    /// Adults absorbed into the children block.
    #[serde(rename = "chi-adu")]
    ChiAdu,
    /// Children and adults both absorbed into the beginners block.
    #[serde(rename = "all")]
    All,
}

impl MergeTag {
    /// The primary group that absorbs `group` this day, if any.
    ///
    /// Returns `None` when `group` leads its own block (merged or not).
    pub fn merged_into(&self, group: Group) -> Option<Group> {
        match (self, group) {
            (MergeTag::BegChi, Group::Children) => Some(Group::Beginners),
            (MergeTag::ChiAdu, Group::Adults) => Some(Group::Children),
            (MergeTag::All, Group::Children) => Some(Group::Beginners),
            (MergeTag::All, Group::Adults) => Some(Group::Beginners),
            _ => None,
        }
    }

    /// Whether `group` is subsumed by another group's block this day.
    pub fn is_merged(&self, group: Group) -> bool {
        self.merged_into(group).is_some()
    }

    /// How many group columns `group`'s block occupies (1, 2, or 3).
    pub fn span(&self, group: Group) -> u8 {
        match (self, group) {
            (MergeTag::All, Group::Beginners) => 3,
            (MergeTag::BegChi, Group::Beginners) => 2,
            (MergeTag::ChiAdu, Group::Children) => 2,
            _ => 1,
        }
    }

    /// Display label for `group`'s block.
    pub fn label(&self, group: Group) -> &'static str {
        match (self, group) {
            (MergeTag::All, Group::Beginners) => "All Levels",
            (MergeTag::BegChi, Group::Beginners) => "Beginners + Children",
            (MergeTag::ChiAdu, Group::Children) => "Children + Adults",
            _ => group.label(),
        }
    }
}
