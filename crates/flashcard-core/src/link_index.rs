#![forbid(unsafe_code)]

//! Partition of box ids into link groups.
//!
//! Boxes in the same link group toggle together. The index only stores ids;
//! it never owns box records, so a dangling id simply has no box to toggle.
//!
//! # Invariants
//!
//! 1. **Partition**: a box id appears in at most one link group.
//! 2. **Size**: every link group has at least two members. A group that
//!    would shrink to one member is deleted outright.
//! 3. **Atomic failure**: a rejected [`link`](LinkGroupIndex::link) leaves
//!    every existing membership untouched.

use indexmap::IndexSet;

use crate::error::{QuizError, Result};
use crate::ids::BoxId;

/// Smallest number of boxes a link group may hold.
pub const MIN_LINK_GROUP_SIZE: usize = 2;

/// A set of at least two box ids that toggle together.
///
/// Equality is set equality: member order is not significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    members: IndexSet<BoxId>,
}

impl LinkGroup {
    pub fn members(&self) -> impl Iterator<Item = &BoxId> {
        self.members.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &BoxId) -> bool {
        self.members.contains(id)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<BoxId> {
        self.members.iter().cloned().collect()
    }
}

/// All link groups of a quiz.
#[derive(Debug, Clone, Default)]
pub struct LinkGroupIndex {
    groups: Vec<LinkGroup>,
}

impl LinkGroupIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `ids` into one new group.
    ///
    /// Every id is first removed from the group currently holding it
    /// (deleting that group if it drops below two members), then the new
    /// group is inserted.
    ///
    /// # Errors
    ///
    /// - [`QuizError::SelfLink`] if an id is listed more than once.
    /// - [`QuizError::TooFewLinkMembers`] if fewer than two ids are given.
    pub fn link<I>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = BoxId>,
    {
        let mut members = IndexSet::new();
        for id in ids {
            if members.contains(&id) {
                return Err(QuizError::SelfLink { id: id.to_string() });
            }
            members.insert(id);
        }
        if members.len() < MIN_LINK_GROUP_SIZE {
            return Err(QuizError::TooFewLinkMembers {
                count: members.len(),
            });
        }

        for id in &members {
            self.detach(id);
        }
        crate::debug!(members = members.len(), "link group created");
        self.groups.push(LinkGroup { members });
        debug_assert!(self.is_well_formed());
        Ok(())
    }

    /// Link exactly two boxes.
    ///
    /// # Errors
    ///
    /// [`QuizError::SelfLink`] when `a == b`.
    pub fn link_pair(&mut self, a: BoxId, b: BoxId) -> Result<()> {
        self.link([a, b])
    }

    /// Remove `id` from its link group. Returns `false` if it was not linked.
    pub fn unlink(&mut self, id: &BoxId) -> bool {
        let removed = self.detach(id);
        if removed {
            crate::debug!(box_id = %id, "box unlinked");
        }
        removed
    }

    /// Forget a deleted box. Same shrink rule as [`unlink`](Self::unlink).
    pub fn remove_id(&mut self, id: &BoxId) -> bool {
        self.detach(id)
    }

    /// Every other id sharing `id`'s link group, in link order.
    #[must_use]
    pub fn linked_partners(&self, id: &BoxId) -> Vec<BoxId> {
        self.group_of(id)
            .map(|group| group.members().filter(|m| *m != id).cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn group_of(&self, id: &BoxId) -> Option<&LinkGroup> {
        self.groups.iter().find(|group| group.contains(id))
    }

    #[must_use]
    pub fn is_linked(&self, id: &BoxId) -> bool {
        self.group_of(id).is_some()
    }

    pub fn groups(&self) -> impl Iterator<Item = &LinkGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Member lists in group order, as persisted.
    #[must_use]
    pub fn to_id_lists(&self) -> Vec<Vec<BoxId>> {
        self.groups.iter().map(LinkGroup::to_vec).collect()
    }

    /// Build an index from persisted member lists.
    ///
    /// Lists are taken in order. An id already consumed by an earlier list
    /// (or repeated inside one list) is dropped, and lists left with fewer
    /// than two members are discarded, so the result is always a partition.
    /// Returns the index and the number of dropped references.
    #[must_use]
    pub fn from_lists_first_wins<I, L>(lists: I) -> (Self, usize)
    where
        I: IntoIterator<Item = L>,
        L: IntoIterator<Item = BoxId>,
    {
        let mut consumed: IndexSet<BoxId> = IndexSet::new();
        let mut groups = Vec::new();
        let mut dropped = 0;
        for list in lists {
            let mut members = IndexSet::new();
            for id in list {
                if consumed.contains(&id) || members.contains(&id) {
                    dropped += 1;
                } else {
                    members.insert(id);
                }
            }
            if members.len() >= MIN_LINK_GROUP_SIZE {
                consumed.extend(members.iter().cloned());
                groups.push(LinkGroup { members });
            } else {
                dropped += members.len();
            }
        }
        (Self { groups }, dropped)
    }

    /// Convert the legacy one-to-one `linkedBoxes` mapping.
    ///
    /// Each `(from, to)` pair becomes a two-member group unless either id
    /// was already consumed by an earlier pair; first-seen pair wins, later
    /// references are dropped rather than merged. Self pairs are skipped.
    /// Returns the index and the number of dropped pairs.
    #[must_use]
    pub fn from_legacy_pairs<I>(pairs: I) -> (Self, usize)
    where
        I: IntoIterator<Item = (BoxId, BoxId)>,
    {
        let mut consumed: IndexSet<BoxId> = IndexSet::new();
        let mut groups = Vec::new();
        let mut dropped = 0;
        for (from, to) in pairs {
            if from == to || consumed.contains(&from) || consumed.contains(&to) {
                dropped += 1;
                continue;
            }
            consumed.insert(from.clone());
            consumed.insert(to.clone());
            groups.push(LinkGroup {
                members: IndexSet::from([from, to]),
            });
        }
        (Self { groups }, dropped)
    }

    /// Check both invariants: disjoint groups, each of size >= 2.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut seen: IndexSet<&BoxId> = IndexSet::new();
        self.groups.iter().all(|group| {
            group.len() >= MIN_LINK_GROUP_SIZE && group.members().all(|id| seen.insert(id))
        })
    }

    fn detach(&mut self, id: &BoxId) -> bool {
        let Some(pos) = self.groups.iter().position(|group| group.contains(id)) else {
            return false;
        };
        let group = &mut self.groups[pos];
        group.members.shift_remove(id);
        if group.members.len() < MIN_LINK_GROUP_SIZE {
            self.groups.remove(pos);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<BoxId> {
        raw.iter().map(|s| BoxId::new(*s)).collect()
    }

    fn id(raw: &str) -> BoxId {
        BoxId::new(raw)
    }

    #[test]
    fn link_creates_group_and_partners() {
        let mut index = LinkGroupIndex::new();
        index.link(ids(&["a", "b", "c"])).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.linked_partners(&id("a")), ids(&["b", "c"]));
        assert_eq!(index.linked_partners(&id("c")), ids(&["a", "b"]));
        assert!(index.linked_partners(&id("z")).is_empty());
    }

    #[test]
    fn relinking_dissolves_prior_memberships() {
        let mut index = LinkGroupIndex::new();
        index.link(ids(&["a", "b"])).unwrap();
        index.link(ids(&["c", "d", "e"])).unwrap();
        index.link(ids(&["b", "d"])).unwrap();

        // {a,b} lost b and was deleted; {c,d,e} kept c and e.
        assert_eq!(index.len(), 2);
        assert!(!index.is_linked(&id("a")));
        assert_eq!(index.linked_partners(&id("c")), ids(&["e"]));
        assert_eq!(index.linked_partners(&id("b")), ids(&["d"]));
        assert!(index.is_well_formed());
    }

    #[test]
    fn self_link_is_rejected_without_side_effects() {
        let mut index = LinkGroupIndex::new();
        index.link(ids(&["a", "b"])).unwrap();
        let err = index.link(ids(&["a", "a"])).unwrap_err();
        assert_eq!(err, QuizError::SelfLink { id: "a".into() });
        assert_eq!(index.linked_partners(&id("a")), ids(&["b"]));

        let err = index.link_pair(id("c"), id("c")).unwrap_err();
        assert!(matches!(err, QuizError::SelfLink { .. }));
    }

    #[test]
    fn too_few_members_is_rejected_without_side_effects() {
        let mut index = LinkGroupIndex::new();
        index.link(ids(&["a", "b"])).unwrap();
        let err = index.link(ids(&["a"])).unwrap_err();
        assert_eq!(err, QuizError::TooFewLinkMembers { count: 1 });
        assert!(index.is_linked(&id("a")));
        assert_eq!(
            index.link(Vec::new()).unwrap_err(),
            QuizError::TooFewLinkMembers { count: 0 }
        );
    }

    #[test]
    fn unlink_shrinks_and_deletes() {
        let mut index = LinkGroupIndex::new();
        index.link(ids(&["a", "b", "c"])).unwrap();
        assert!(index.unlink(&id("a")));
        assert_eq!(index.linked_partners(&id("b")), ids(&["c"]));
        assert!(index.unlink(&id("b")));
        assert!(index.is_empty());
        assert!(!index.unlink(&id("c")));
    }

    #[test]
    fn remove_id_follows_unlink_rule() {
        let mut index = LinkGroupIndex::new();
        index.link(ids(&["a", "b"])).unwrap();
        assert!(index.remove_id(&id("b")));
        assert!(index.is_empty());
        assert!(!index.remove_id(&id("b")));
    }

    #[test]
    fn legacy_pairs_first_seen_wins() {
        let pairs = vec![
            (id("box1"), id("box2")),
            (id("box2"), id("box3")),
            (id("box4"), id("box4")),
            (id("box5"), id("box6")),
        ];
        let (index, dropped) = LinkGroupIndex::from_legacy_pairs(pairs);
        assert_eq!(dropped, 2);
        assert_eq!(index.len(), 2);
        assert_eq!(index.linked_partners(&id("box1")), ids(&["box2"]));
        assert!(!index.is_linked(&id("box3")));
        assert!(index.is_well_formed());
    }

    #[test]
    fn lists_first_wins_repairs_overlap() {
        let lists = vec![
            ids(&["a", "b", "a"]),
            ids(&["b", "c"]),
            ids(&["d"]),
            ids(&["c", "e", "f"]),
        ];
        let (index, dropped) = LinkGroupIndex::from_lists_first_wins(lists);
        // a (repeat), b (consumed), c (lonely list), d (lonely list)
        assert_eq!(dropped, 4);
        assert_eq!(index.to_id_lists(), vec![ids(&["a", "b"]), ids(&["c", "e", "f"])]);
        assert!(index.is_well_formed());
    }

    #[test]
    fn group_equality_ignores_order() {
        let mut left = LinkGroupIndex::new();
        left.link(ids(&["a", "b", "c"])).unwrap();
        let mut right = LinkGroupIndex::new();
        right.link(ids(&["c", "a", "b"])).unwrap();
        assert_eq!(left.group_of(&id("a")), right.group_of(&id("b")));
    }
}
