use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::{EntryId, Plan};
use crate::local_files::FileSystem;

/// Entries whose destination collides. Derived state: rebuild after every edit
/// and after every execution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictSet {
    ids: BTreeSet<EntryId>,
}

impl ConflictSet {
    pub fn contains(&self, id: EntryId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<EntryId> for ConflictSet {
    fn from_iter<I: IntoIterator<Item = EntryId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Full recomputation of the conflict set.
///
/// Only eligible entries (rename requested and name actually changes) take part.
/// An eligible entry conflicts when another eligible entry in the same parent
/// plans the same name, or when something other than the entry's own source
/// already exists at its destination.
pub fn recompute_conflicts(plan: &Plan, fs: &dyn FileSystem) -> ConflictSet {
    let mut ids = BTreeSet::new();

    let mut groups: HashMap<(&str, &str), Vec<EntryId>> = HashMap::new();
    for (id, entry) in plan.iter().filter(|(_, e)| e.is_eligible()) {
        groups
            .entry((entry.parent_path.as_str(), entry.new_name.as_str()))
            .or_default()
            .push(id);
    }
    for members in groups.values().filter(|m| m.len() > 1) {
        ids.extend(members.iter().copied());
    }

    for (id, entry) in plan.iter().filter(|(_, e)| e.is_eligible()) {
        let destination = entry.destination_path(&plan.root);
        if fs.exists(&destination) && !fs.same_object(&destination, &entry.source_path(&plan.root))
        {
            ids.insert(id);
        }
    }

    ConflictSet { ids }
}
