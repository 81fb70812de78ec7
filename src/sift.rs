//! Aggregate scope-tree occurrences into hint tokens.

use crate::scope::{KeyAttribute, ScopeTree, Walk};
use crate::types::{AssociationTable, Token, TokenValue};
use indexmap::IndexMap;

/// Group every record of `walk` by `key`, one token per distinct key with
/// its start offsets in ascending order.
///
/// Tokens come out in first-occurrence order; callers should treat the
/// result as a set.
pub fn sift_positions(scope: &ScopeTree, walk: Walk, key: KeyAttribute) -> Vec<Token> {
    let occurrences = scope.walk_down(
        walk,
        IndexMap::<TokenValue, Vec<usize>>::new(),
        |mut acc, node| {
            if let Some(value) = node.key(key) {
                acc.entry(value).or_default().push(node.range.start);
            }
            acc
        },
    );

    occurrences
        .into_iter()
        .map(|(value, mut positions)| {
            positions.sort_unstable();
            Token::new(value, positions)
        })
        .collect()
}

/// Count `object.property` accesses across the whole tree.
pub fn sift_associations(scope: &ScopeTree) -> AssociationTable {
    scope.walk_down_associations(AssociationTable::new(), |mut acc, assoc| {
        *acc.entry(assoc.object.name.clone())
            .or_default()
            .entry(assoc.property.name.clone())
            .or_insert(0) += 1;
        acc
    })
}
