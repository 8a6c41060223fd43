//! Snapshot matching primitives.
//!
//! Two flavours of diff classify entities of an early and a later snapshot
//! as additions, subtractions or unmodified:
//!
//! - [`key_set_diff`] compares identity keys with plain set algebra.
//! - [`structural_diff`] pairs records by a per-type equality predicate,
//!   greedily taking the earliest unmatched candidate of the later snapshot.

use crate::graph::{Request, ServiceNode};
use std::collections::HashSet;
use std::hash::Hash;

/// Equality over the fields that identify a record across snapshots.
///
/// Fields outside the match key may differ between two records that are
/// still considered the same.
pub trait StructuralMatch {
    fn matches(&self, other: &Self) -> bool;
}

impl StructuralMatch for ServiceNode {
    fn matches(&self, other: &Self) -> bool {
        self.name == other.name && self.node_type == other.node_type && self.path == other.path
    }
}

impl StructuralMatch for Request {
    // `argument` and `endpoint_function` are deliberately not compared.
    fn matches(&self, other: &Self) -> bool {
        self.verb == other.verb
            && self.destination_url == other.destination_url
            && self.source_method == other.source_method
            && self.destination_class_name == other.destination_class_name
            && self.class_name == other.class_name
            && self.ms_return == other.ms_return
    }
}

/// Result of comparing two key sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySetDiff<K> {
    /// Keys only in the later set, in later order.
    pub additions: Vec<K>,
    /// Keys only in the early set, in early order.
    pub subtractions: Vec<K>,
    /// Keys in both sets, in early order.
    pub unmodified: Vec<K>,
}

impl<K> KeySetDiff<K> {
    pub fn has_changes(&self) -> bool {
        !self.additions.is_empty() || !self.subtractions.is_empty()
    }
}

/// Partitions the union of two key sets.
///
/// Duplicate keys within one side are collapsed to their first occurrence.
pub fn key_set_diff<K, I, J>(early: I, later: J) -> KeySetDiff<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
    J: IntoIterator<Item = K>,
{
    let early = dedup(early);
    let later = dedup(later);

    let early_set: HashSet<&K> = early.iter().collect();
    let later_set: HashSet<&K> = later.iter().collect();

    let additions = later
        .iter()
        .filter(|k| !early_set.contains(k))
        .cloned()
        .collect();
    let subtractions = early
        .iter()
        .filter(|k| !later_set.contains(k))
        .cloned()
        .collect();
    let unmodified = early
        .iter()
        .filter(|k| later_set.contains(k))
        .cloned()
        .collect();

    KeySetDiff {
        additions,
        subtractions,
        unmodified,
    }
}

fn dedup<K: Eq + Hash + Clone>(keys: impl IntoIterator<Item = K>) -> Vec<K> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

/// Result of pairing two record sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDiff<'a, T> {
    /// Unmatched later records, in later order.
    pub additions: Vec<&'a T>,
    /// Unmatched early records, in early order.
    pub subtractions: Vec<&'a T>,
    /// The later record of each matched pair, in early order.
    pub unmodified: Vec<&'a T>,
}

impl<T> MatchDiff<'_, T> {
    pub fn has_changes(&self) -> bool {
        !self.additions.is_empty() || !self.subtractions.is_empty()
    }
}

/// Greedy first-match pairing of two sequences.
///
/// Each early record consumes the earliest later record it matches that is
/// not yet taken. Duplicates on the early side therefore each need their own
/// partner. Runs in O(|early| * |later|).
pub fn structural_diff<'a, T: StructuralMatch>(
    early: &'a [T],
    later: &'a [T],
) -> MatchDiff<'a, T> {
    let mut taken = vec![false; later.len()];
    let mut subtractions = Vec::new();
    let mut unmodified = Vec::new();

    for record in early {
        let partner = (0..later.len()).find(|&j| !taken[j] && record.matches(&later[j]));

        match partner {
            Some(j) => {
                taken[j] = true;
                unmodified.push(&later[j]);
            }
            None => subtractions.push(record),
        }
    }

    let additions = later
        .iter()
        .zip(&taken)
        .filter(|&(_, &used)| !used)
        .map(|(record, _)| record)
        .collect();

    MatchDiff {
        additions,
        subtractions,
        unmodified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Tagged {
        key: u32,
        payload: &'static str,
    }

    impl StructuralMatch for Tagged {
        fn matches(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    fn tagged(key: u32, payload: &'static str) -> Tagged {
        Tagged { key, payload }
    }

    fn request(url: &str, argument: serde_json::Value, endpoint: &str) -> Request {
        Request {
            destination_url: url.to_string(),
            source_method: "placeOrder".into(),
            endpoint_function: endpoint.to_string(),
            class_name: "OrderService".into(),
            destination_class_name: "UserController".into(),
            verb: Some("GET".into()),
            argument,
            ms_return: "User".into(),
        }
    }

    #[test]
    fn test_key_set_partition() {
        let diff = key_set_diff(["a", "b", "c"], ["c", "d", "a", "e"]);
        assert_eq!(diff.additions, vec!["d", "e"]);
        assert_eq!(diff.subtractions, vec!["b"]);
        assert_eq!(diff.unmodified, vec!["a", "c"]);

        let mut union: Vec<&str> = diff
            .additions
            .iter()
            .chain(&diff.subtractions)
            .chain(&diff.unmodified)
            .copied()
            .collect();
        union.sort();
        assert_eq!(union, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_key_set_partition_is_disjoint_for_many_inputs() {
        let samples: Vec<(Vec<u8>, Vec<u8>)> = vec![
            (vec![], vec![]),
            (vec![1, 2, 3], vec![]),
            (vec![], vec![4, 5]),
            (vec![1, 1, 2], vec![2, 2, 3]),
            (vec![9, 8, 7, 6], vec![6, 7, 8, 9]),
        ];

        for (a, b) in samples {
            let diff = key_set_diff(a.clone(), b.clone());
            let adds: HashSet<u8> = diff.additions.iter().copied().collect();
            let subs: HashSet<u8> = diff.subtractions.iter().copied().collect();
            let same: HashSet<u8> = diff.unmodified.iter().copied().collect();

            assert!(adds.is_disjoint(&subs));
            assert!(adds.is_disjoint(&same));
            assert!(subs.is_disjoint(&same));

            let expected: HashSet<u8> = a.iter().chain(&b).copied().collect();
            let union: HashSet<u8> = adds.union(&subs).chain(&same).copied().collect();
            assert_eq!(union, expected);
        }
    }

    #[test]
    fn test_structural_diff_classifies() {
        let early = vec![tagged(1, "old"), tagged(2, "gone")];
        let later = vec![tagged(3, "new"), tagged(1, "updated")];

        let diff = structural_diff(&early, &later);
        assert_eq!(diff.subtractions, vec![&early[1]]);
        assert_eq!(diff.additions, vec![&later[0]]);
        // the later copy is reported
        assert_eq!(diff.unmodified[0].payload, "updated");
        assert!(diff.has_changes());
    }

    #[test]
    fn test_structural_diff_conserves_counts() {
        let cases: Vec<(Vec<u32>, Vec<u32>)> = vec![
            (vec![], vec![]),
            (vec![1, 1, 1], vec![1]),
            (vec![1], vec![1, 1, 1]),
            (vec![1, 2, 2, 3], vec![2, 3, 3, 4]),
            (vec![5, 6], vec![7, 8]),
        ];

        for (a, b) in cases {
            let early: Vec<Tagged> = a.iter().map(|&k| tagged(k, "")).collect();
            let later: Vec<Tagged> = b.iter().map(|&k| tagged(k, "")).collect();
            let diff = structural_diff(&early, &later);

            assert_eq!(diff.subtractions.len() + diff.unmodified.len(), early.len());
            assert_eq!(diff.additions.len() + diff.unmodified.len(), later.len());
        }
    }

    #[test]
    fn test_duplicates_each_consume_a_partner() {
        let early = vec![tagged(1, "a"), tagged(1, "b")];
        let later = vec![tagged(1, "x")];

        let diff = structural_diff(&early, &later);
        assert_eq!(diff.unmodified.len(), 1);
        assert_eq!(diff.subtractions.len(), 1);
        assert!(diff.additions.is_empty());
    }

    #[test]
    fn test_request_match_ignores_argument_and_endpoint() {
        let early = request("/users", json!(["id"]), "getUser");
        let later = request("/users", json!(["userId", "verbose"]), "fetchUser");
        assert!(early.matches(&later));

        let mut other_verb = later.clone();
        other_verb.verb = Some("POST".into());
        assert!(!early.matches(&other_verb));

        let mut other_return = later;
        other_return.ms_return = "Optional<User>".into();
        assert!(!early.matches(&other_return));
    }

    #[test]
    fn test_node_match_uses_name_type_path() {
        let a = ServiceNode::new("users", "/src/users");
        let moved = ServiceNode::new("users", "/services/users");
        assert!(a.matches(&a.clone()));
        assert!(!a.matches(&moved));
    }
}
