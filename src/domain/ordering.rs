//! Dense 1..N ordering for positioned collections (nav links, social links).
//!
//! Persistence adapters call into these helpers while holding a table lock so
//! that appends and reorders observe a consistent snapshot.

use std::collections::HashSet;

use thiserror::Error;

/// Position assigned to one record after a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: i64,
    pub position: i32,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("ordered_ids must contain exactly all current ids; duplicated: {ids:?}")]
    Duplicate { ids: Vec<i64> },
    #[error("ordered_ids must contain exactly all current ids; unknown: {ids:?}")]
    Unknown { ids: Vec<i64> },
    #[error("ordered_ids must contain exactly all current ids; missing: {ids:?}")]
    Missing { ids: Vec<i64> },
    #[error("collection is too large to order")]
    Overflow,
}

/// Position for a record appended after `current_max`.
pub fn next_position(current_max: Option<i32>) -> i32 {
    match current_max {
        Some(max) if max > 0 => max.saturating_add(1),
        _ => 1,
    }
}

/// Validate `requested` against the ids currently stored and compute the new
/// positions.
///
/// The requested sequence must be a permutation of `current`: no duplicates,
/// no unknown ids, nothing left out. Positions follow the 1-based index in
/// `requested`.
pub fn plan_reorder(current: &[i64], requested: &[i64]) -> Result<Vec<Placement>, ReorderError> {
    let mut seen = HashSet::with_capacity(requested.len());
    let mut duplicated = Vec::new();
    for id in requested {
        if !seen.insert(*id) && !duplicated.contains(id) {
            duplicated.push(*id);
        }
    }
    if !duplicated.is_empty() {
        return Err(ReorderError::Duplicate { ids: duplicated });
    }

    let existing: HashSet<i64> = current.iter().copied().collect();

    let unknown: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect();
    if !unknown.is_empty() {
        return Err(ReorderError::Unknown { ids: unknown });
    }

    let mut missing: Vec<i64> = existing.difference(&seen).copied().collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(ReorderError::Missing { ids: missing });
    }

    dense_positions(requested)
}

/// Assign positions `1..=N` to `ids` in their given order.
pub fn dense_positions(ids: &[i64]) -> Result<Vec<Placement>, ReorderError> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            let position = i32::try_from(index + 1).map_err(|_| ReorderError::Overflow)?;
            Ok(Placement { id: *id, position })
        })
        .collect()
}
