//! Constraint index
//!
//! A tree with exactly four strata: document id, action kind, actor id, and
//! a bucket of value conditions at the leaf. A constraint covering k
//! documents and m actors is written into all k x m cells at insertion, so a
//! classification is four map lookups plus the matched bucket, independent of
//! batch size.

use std::collections::HashMap;

use accord_core::{ActionKind, Condition, Constraint, Event};

use crate::evaluator::condition_matches;

/// Level-2 node: action kinds seen on one document.
#[derive(Debug, Clone, Default)]
struct ActionNode {
    actions: HashMap<ActionKind, ActorNode>,
}

/// Level-3 node: actors restricted for one (document, action) pair.
#[derive(Debug, Clone, Default)]
struct ActorNode {
    actors: HashMap<String, ConditionBucket>,
}

/// Level-4 leaf: conditions for one (document, action, actor) cell, kept in
/// insertion order and combined by logical OR.
#[derive(Debug, Clone, Default)]
struct ConditionBucket {
    conditions: Vec<Condition>,
}

/// The four-level constraint index.
///
/// Built once per batch, immutable during classification. Duplicate
/// insertion is legal and additive; conditions landing in an occupied cell
/// are appended, never replaced.
#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    documents: HashMap<String, ActionNode>,
}

impl ConstraintIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parsed constraint, fanning its condition out over every
    /// (document, actor) cell it covers.
    pub fn insert(&mut self, constraint: &Constraint) {
        for document_id in &constraint.document_ids {
            let action_node = self.documents.entry(document_id.clone()).or_default();
            let actor_node = action_node
                .actions
                .entry(constraint.action_kind)
                .or_default();
            for actor_id in &constraint.actor_ids {
                actor_node
                    .actors
                    .entry(actor_id.clone())
                    .or_default()
                    .conditions
                    .push(constraint.condition.clone());
            }
        }
    }

    /// Walk the four keys for an event; missing node at any level means no
    /// applicable rule. Conditions evaluate in insertion order and
    /// short-circuit on the first hit.
    pub fn check(&self, event: &Event) -> bool {
        let Some(action_node) = self.documents.get(&event.document_id) else {
            return false;
        };
        let Some(actor_node) = action_node.actions.get(&event.action_kind) else {
            return false;
        };
        let Some(bucket) = actor_node.actors.get(&event.actor) else {
            return false;
        };
        bucket
            .conditions
            .iter()
            .any(|condition| condition_matches(condition, event.value.as_ref()))
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Total conditions stored across all cells. Grows by documents x actors
    /// per inserted constraint.
    pub fn condition_count(&self) -> usize {
        self.documents
            .values()
            .flat_map(|action_node| action_node.actions.values())
            .flat_map(|actor_node| actor_node.actors.values())
            .map(|bucket| bucket.conditions.len())
            .sum()
    }

    /// Whether no constraint has been inserted.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_core::{Comparator, ConditionValues, EventValue, Timestamp};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn now() -> Timestamp {
        "2024-04-22T15:57:06Z".parse().unwrap()
    }

    fn unconditional(docs: &[&str], kind: ActionKind, actors: &[&str]) -> Constraint {
        Constraint::new(
            strings(docs),
            kind,
            strings(actors),
            Condition::unconditional(),
        )
    }

    #[test]
    fn missing_levels_mean_no_applicable_rule() {
        let mut index = ConstraintIndex::new();
        index.insert(&unconditional(&["doc1"], ActionKind::CanDelete, &["bob@x"]));

        let wrong_doc = Event::new("doc2", ActionKind::CanDelete, "bob@x", now());
        let wrong_kind = Event::new("doc1", ActionKind::CanCreate, "bob@x", now());
        let wrong_actor = Event::new("doc1", ActionKind::CanDelete, "alice@x", now());
        let hit = Event::new("doc1", ActionKind::CanDelete, "bob@x", now());

        assert!(!index.check(&wrong_doc));
        assert!(!index.check(&wrong_kind));
        assert!(!index.check(&wrong_actor));
        assert!(index.check(&hit));
    }

    #[test]
    fn grouped_constraint_occupies_every_cell() {
        let mut index = ConstraintIndex::new();
        index.insert(&unconditional(
            &["doc1", "doc2"],
            ActionKind::CanRename,
            &["a@x", "b@x"],
        ));

        assert_eq!(index.document_count(), 2);
        assert_eq!(index.condition_count(), 4);
        for doc in ["doc1", "doc2"] {
            for actor in ["a@x", "b@x"] {
                let event = Event::new(doc, ActionKind::CanRename, actor, now());
                assert!(index.check(&event));
            }
        }
    }

    #[test]
    fn occupied_cells_accumulate_conditions() {
        // A membership condition that cannot match, then an unconditional
        // one in the same cell; the bucket must hold both.
        let miss = Constraint::new(
            strings(&["doc1"]),
            ActionKind::AddPermission,
            strings(&["bob@x"]),
            Condition::new(Some(Comparator::In), ConditionValues::Users(Vec::new())),
        );
        let hit = unconditional(&["doc1"], ActionKind::AddPermission, &["bob@x"]);

        let mut index = ConstraintIndex::new();
        index.insert(&miss);
        index.insert(&hit);
        assert_eq!(index.condition_count(), 2);

        let event = Event::new("doc1", ActionKind::AddPermission, "bob@x", now())
            .with_value(EventValue::User("carol@x".to_string()));
        assert!(index.check(&event));
    }

    #[test]
    fn empty_index_flags_nothing() {
        let index = ConstraintIndex::new();
        assert!(index.is_empty());
        let event = Event::new("doc1", ActionKind::CanDelete, "bob@x", now());
        assert!(!index.check(&event));
    }
}
