//! Set operations for powerset lattices.
//!
//! Every analysis in this crate works on finite sets ordered by inclusion. The
//! functions here are the meet operations and the standard transfer function those
//! analyses are built from.
//!
//! - **May analyses** (liveness, reaching definitions) meet with [`union`]; the
//!   initial value is the empty set.
//! - **Must analyses** (dominators) meet with [`intersection`]; the initial value is
//!   the full universe.

use std::hash::Hash;

use crate::analysis::dataflow::facts::FactSet;

/// Union of all input sets. Empty input yields the empty set.
#[must_use]
pub fn union<T: Clone + Eq + Hash>(sets: &[&FactSet<T>]) -> FactSet<T> {
    let mut result = FactSet::new();
    for set in sets {
        result.extend(set.iter().cloned());
    }
    result
}

/// Intersection of all input sets.
///
/// Empty input yields the empty set rather than the lattice top: a node with no
/// neighbours has no facts flowing in.
#[must_use]
pub fn intersection<T: Clone + Eq + Hash>(sets: &[&FactSet<T>]) -> FactSet<T> {
    let Some((first, rest)) = sets.split_first() else {
        return FactSet::new();
    };

    first
        .iter()
        .filter(|fact| rest.iter().all(|set| set.contains(*fact)))
        .cloned()
        .collect()
}

/// The standard transfer function `gen ∪ (input − kill)`.
#[must_use]
pub fn gen_kill<T: Clone + Eq + Hash>(
    input: &FactSet<T>,
    generated: &FactSet<T>,
    killed: &FactSet<T>,
) -> FactSet<T> {
    input
        .iter()
        .filter(|fact| !killed.contains(*fact))
        .chain(generated.iter())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[u32]) -> FactSet<u32> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_union() {
        let a = set(&[1, 2]);
        let b = set(&[2, 3]);
        assert_eq!(union(&[&a, &b]), set(&[1, 2, 3]));
        assert!(union::<u32>(&[]).is_empty());
    }

    #[test]
    fn test_intersection() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3, 4]);
        let c = set(&[3, 2]);
        assert_eq!(intersection(&[&a, &b, &c]), set(&[2, 3]));
        assert_eq!(intersection(&[&a]), a);
    }

    #[test]
    fn test_intersection_of_nothing_is_empty() {
        assert!(intersection::<u32>(&[]).is_empty());
    }

    #[test]
    fn test_gen_kill() {
        let input = set(&[1, 2, 3]);
        let out = gen_kill(&input, &set(&[7]), &set(&[2, 7]));
        // gen wins over kill for the same fact
        assert_eq!(out, set(&[1, 3, 7]));
    }
}
