//! Location hierarchy.
//!
//! Locations form a forest through an optional `parent_location_id`.
//! [`LocationTree`] holds a loaded snapshot as an arena keyed by id, with a
//! parent to children index built once per load.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Separator used when rendering a location's ancestor path.
pub const PATH_SEPARATOR: &str = " > ";

/// Kind of area a location represents. Maps to the `area_type` PG enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "area_type"))]
pub enum AreaType {
    Village,
    Island,
    City,
    Wilderness,
    Dungeon,
}

impl AreaType {
    pub fn as_str(self) -> &'static str {
        match self {
            AreaType::Village => "Village",
            AreaType::Island => "Island",
            AreaType::City => "City",
            AreaType::Wilderness => "Wilderness",
            AreaType::Dungeon => "Dungeon",
        }
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `locations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub area_type: AreaType,
    pub parent_location_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Location {
    pub fn is_root(&self) -> bool {
        self.parent_location_id.is_none()
    }
}

/// An immutable, fully loaded location forest.
#[derive(Debug, Clone, Default)]
pub struct LocationTree {
    /// Locations in load order.
    nodes: Vec<Location>,
    by_id: HashMap<DbId, usize>,
    children: HashMap<DbId, Vec<usize>>,
}

impl LocationTree {
    /// Build the arena. Children keep the order of `locations`.
    pub fn new(locations: Vec<Location>) -> Self {
        let by_id = locations
            .iter()
            .enumerate()
            .map(|(idx, loc)| (loc.id, idx))
            .collect();

        let mut children: HashMap<DbId, Vec<usize>> = HashMap::new();
        for (idx, loc) in locations.iter().enumerate() {
            if let Some(parent_id) = loc.parent_location_id {
                children.entry(parent_id).or_default().push(idx);
            }
        }

        Self {
            nodes: locations,
            by_id,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: DbId) -> Option<&Location> {
        self.by_id.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.nodes.iter()
    }

    /// Direct children of `id`, in load order.
    pub fn children(&self, id: DbId) -> Vec<&Location> {
        self.children
            .get(&id)
            .map(|idxs| idxs.iter().map(|&idx| &self.nodes[idx]).collect())
            .unwrap_or_default()
    }

    /// Locations without a parent.
    pub fn roots(&self) -> Vec<&Location> {
        self.nodes.iter().filter(|loc| loc.is_root()).collect()
    }

    pub fn by_area_type(&self, area_type: AreaType) -> Vec<&Location> {
        self.nodes
            .iter()
            .filter(|loc| loc.area_type == area_type)
            .collect()
    }

    /// Ancestors of `id`, nearest parent first.
    ///
    /// A parent id that is not in the tree ends the walk. Revisiting a
    /// location fails with [`CoreError::CycleDetected`].
    pub fn ancestors(&self, id: DbId) -> Result<Vec<&Location>, CoreError> {
        let start = self.get(id).ok_or(CoreError::NotFound {
            entity: "location",
            id,
        })?;

        let mut seen = HashSet::from([start.id]);
        let mut ancestors = Vec::new();
        let mut next = start.parent_location_id;

        while let Some(parent_id) = next {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            if !seen.insert(parent.id) {
                return Err(CoreError::CycleDetected {
                    entity: "location",
                    id: parent.id,
                });
            }
            ancestors.push(parent);
            next = parent.parent_location_id;
        }

        Ok(ancestors)
    }

    /// Names from the root down to `id`, joined by `" > "`.
    ///
    /// # Examples
    ///
    /// ```
    /// use questlog_core::location::{AreaType, Location, LocationTree};
    ///
    /// let now = chrono::Utc::now();
    /// let loc = |id, name: &str, parent| Location {
    ///     id,
    ///     name: name.to_string(),
    ///     area_type: AreaType::City,
    ///     parent_location_id: parent,
    ///     created_at: now,
    ///     updated_at: now,
    /// };
    /// let tree = LocationTree::new(vec![
    ///     loc(1, "Stormreach", None),
    ///     loc(2, "The Harbor", Some(1)),
    /// ]);
    /// assert_eq!(tree.full_path(2).unwrap(), "Stormreach > The Harbor");
    /// ```
    pub fn full_path(&self, id: DbId) -> Result<String, CoreError> {
        let ancestors = self.ancestors(id)?;
        let mut names: Vec<&str> = ancestors.iter().rev().map(|loc| loc.name.as_str()).collect();
        // `ancestors` already proved the location exists.
        if let Some(loc) = self.get(id) {
            names.push(&loc.name);
        }
        Ok(names.join(PATH_SEPARATOR))
    }

    /// Every location below `id`, pre-order: each child is followed by its
    /// own subtree before the next sibling. Empty for leaves and unknown ids.
    pub fn all_descendants(&self, id: DbId) -> Vec<&Location> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([id]);

        // Stack holds siblings in reverse so the first child pops first.
        let mut stack: Vec<usize> = self.child_indices_rev(id);
        while let Some(idx) = stack.pop() {
            let loc = &self.nodes[idx];
            if !visited.insert(loc.id) {
                continue;
            }
            out.push(loc);
            stack.extend(self.child_indices_rev(loc.id));
        }

        out
    }

    fn child_indices_rev(&self, id: DbId) -> Vec<usize> {
        self.children
            .get(&id)
            .map(|idxs| idxs.iter().rev().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn loc(id: DbId, name: &str, area_type: AreaType, parent: Option<DbId>) -> Location {
        Location {
            id,
            name: name.to_string(),
            area_type,
            parent_location_id: parent,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn stormreach() -> LocationTree {
        LocationTree::new(vec![
            loc(1, "Stormreach", AreaType::City, None),
            loc(2, "The Harbor", AreaType::City, Some(1)),
            loc(3, "The Catacombs", AreaType::Dungeon, Some(2)),
        ])
    }

    fn names(locs: &[&Location]) -> Vec<String> {
        locs.iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn full_path_root_first() {
        let tree = stormreach();
        assert_eq!(
            tree.full_path(3).unwrap(),
            "Stormreach > The Harbor > The Catacombs"
        );
        assert_eq!(tree.full_path(1).unwrap(), "Stormreach");
    }

    #[test]
    fn full_path_unknown_location() {
        assert_matches!(
            stormreach().full_path(99),
            Err(CoreError::NotFound { entity: "location", id: 99 })
        );
    }

    #[test]
    fn full_path_stops_at_missing_parent() {
        let tree = LocationTree::new(vec![
            loc(2, "The Harbor", AreaType::City, Some(1)),
            loc(3, "The Catacombs", AreaType::Dungeon, Some(2)),
        ]);
        assert_eq!(tree.full_path(3).unwrap(), "The Harbor > The Catacombs");
    }

    #[test]
    fn full_path_detects_cycle() {
        let tree = LocationTree::new(vec![
            loc(1, "A", AreaType::City, Some(2)),
            loc(2, "B", AreaType::City, Some(1)),
        ]);
        assert_matches!(tree.full_path(1), Err(CoreError::CycleDetected { .. }));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let tree = LocationTree::new(vec![loc(1, "A", AreaType::City, Some(1))]);
        assert_matches!(
            tree.ancestors(1),
            Err(CoreError::CycleDetected { id: 1, .. })
        );
    }

    #[test]
    fn ancestors_nearest_first() {
        let tree = stormreach();
        assert_eq!(
            names(&tree.ancestors(3).unwrap()),
            vec!["The Harbor", "Stormreach"]
        );
        assert!(tree.ancestors(1).unwrap().is_empty());
    }

    #[test]
    fn descendants_pre_order() {
        // Root -> A -> C, Root -> B
        let tree = LocationTree::new(vec![
            loc(1, "Root", AreaType::Island, None),
            loc(2, "A", AreaType::City, Some(1)),
            loc(3, "B", AreaType::Wilderness, Some(1)),
            loc(4, "C", AreaType::Dungeon, Some(2)),
        ]);
        let first = names(&tree.all_descendants(1));
        assert_eq!(first, vec!["A", "C", "B"]);
        // Stateless: repeated calls agree.
        assert_eq!(names(&tree.all_descendants(1)), first);
    }

    #[test]
    fn descendants_of_leaf_and_unknown() {
        let tree = stormreach();
        assert!(tree.all_descendants(3).is_empty());
        assert!(tree.all_descendants(42).is_empty());
    }

    #[test]
    fn descendants_terminate_on_cycle() {
        let tree = LocationTree::new(vec![
            loc(1, "A", AreaType::City, Some(2)),
            loc(2, "B", AreaType::City, Some(1)),
        ]);
        assert_eq!(names(&tree.all_descendants(1)), vec!["B"]);
    }

    #[test]
    fn roots_children_and_area_types() {
        let tree = stormreach();
        assert!(tree.get(1).unwrap().is_root());
        assert!(!tree.get(2).unwrap().is_root());
        assert_eq!(names(&tree.roots()), vec!["Stormreach"]);
        assert_eq!(names(&tree.children(1)), vec!["The Harbor"]);
        assert!(tree.children(3).is_empty());
        assert_eq!(
            names(&tree.by_area_type(AreaType::Dungeon)),
            vec!["The Catacombs"]
        );
    }
}
