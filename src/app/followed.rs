//! Followed-categories filter
//!
//! The user's subscription is either "everything" or an explicit list of
//! category files. "Everything" is stored as the absence of a list so that
//! categories added upstream later are picked up automatically.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The user's category subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum FollowedSet {
    /// No filter; follow every known category
    #[default]
    All,
    /// Follow exactly these category files, in this order
    Only(Vec<String>),
}

impl FollowedSet {
    /// Whether a category file is followed
    pub fn includes(&self, category_file: &str) -> bool {
        match self {
            FollowedSet::All => true,
            FollowedSet::Only(files) => files.iter().any(|f| f == category_file),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FollowedSet::All)
    }

    /// Resolve into a concrete working set, see [`resolve`]
    pub fn resolve(&self, all_known: &[String]) -> Vec<String> {
        resolve(self, all_known)
    }
}

impl From<Option<Vec<String>>> for FollowedSet {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            Some(files) if !files.is_empty() => FollowedSet::Only(files),
            _ => FollowedSet::All,
        }
    }
}

impl From<FollowedSet> for Option<Vec<String>> {
    fn from(value: FollowedSet) -> Self {
        match value {
            FollowedSet::All => None,
            FollowedSet::Only(files) => Some(files),
        }
    }
}

/// Working set of category files for a saved preference
///
/// `All` (or an empty explicit list) yields every known file in index order.
/// An explicit list is returned as saved; identifiers that are no longer known
/// are left for the caller to skip.
pub fn resolve(saved: &FollowedSet, all_known: &[String]) -> Vec<String> {
    match saved {
        FollowedSet::Only(files) if !files.is_empty() => files.clone(),
        _ => all_known.to_vec(),
    }
}

/// Normalize a user selection before it is persisted
///
/// An empty selection, or one that covers exactly the known categories,
/// becomes `All`. Anything else is stored verbatim.
pub fn normalize_for_save(selected: &[String], all_known: &[String]) -> FollowedSet {
    if selected.is_empty() {
        return FollowedSet::All;
    }

    let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let known_set: HashSet<&str> = all_known.iter().map(String::as_str).collect();

    if !known_set.is_empty() && selected_set == known_set {
        FollowedSet::All
    } else {
        FollowedSet::Only(selected.to_vec())
    }
}
