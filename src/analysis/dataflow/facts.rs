//! Named per-node fact sets produced by an analysis run.

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::analysis::CfgNode;

/// A set of facts attached to one node.
pub type FactSet<T> = HashSet<T>;

/// The symbolic name of a fact family.
///
/// The string forms (`gen`, `kill`, `in`, `out`, `df`) are what downstream passes use
/// to look fact families up, and parse back with [`str::parse`].
///
/// # Examples
///
/// ```rust
/// use cfgflow::analysis::dataflow::FactKind;
///
/// assert_eq!(FactKind::Frontier.to_string(), "df");
/// assert_eq!("in".parse::<FactKind>(), Ok(FactKind::In));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
pub enum FactKind {
    /// Facts a node generates
    #[strum(serialize = "gen")]
    Gen,
    /// Facts a node kills
    #[strum(serialize = "kill")]
    Kill,
    /// Facts holding on entry to a node
    #[strum(serialize = "in")]
    In,
    /// Facts holding on exit from a node
    #[strum(serialize = "out")]
    Out,
    /// Dominance frontier of a node
    #[strum(serialize = "df")]
    Frontier,
}

/// An immutable bundle of fact sets keyed by fact kind and node.
///
/// Lookups never fail: a kind or node without an entry reads as the empty set.
#[derive(Debug, Clone)]
pub struct CfgFacts<T: Eq + Hash> {
    facts: HashMap<FactKind, HashMap<CfgNode, FactSet<T>>>,
    empty: FactSet<T>,
}

impl<T: Eq + Hash> Default for CfgFacts<T> {
    fn default() -> Self {
        CfgFacts {
            facts: HashMap::new(),
            empty: FactSet::new(),
        }
    }
}

impl<T: Eq + Hash> CfgFacts<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_all(&mut self, kind: FactKind, sets: HashMap<CfgNode, FactSet<T>>) {
        self.facts.insert(kind, sets);
    }

    /// Returns the facts of `kind` at `node`, or the empty set.
    #[must_use]
    pub fn get(&self, kind: FactKind, node: CfgNode) -> &FactSet<T> {
        self.facts
            .get(&kind)
            .and_then(|sets| sets.get(&node))
            .unwrap_or(&self.empty)
    }

    /// Returns `true` if `fact` is among the facts of `kind` at `node`.
    #[must_use]
    pub fn contains(&self, kind: FactKind, node: CfgNode, fact: &T) -> bool {
        self.get(kind, node).contains(fact)
    }

    /// Returns every node-to-set mapping recorded for `kind`.
    #[must_use]
    pub fn family(&self, kind: FactKind) -> Option<&HashMap<CfgNode, FactSet<T>>> {
        self.facts.get(&kind)
    }

    /// Returns `true` if any facts were recorded for `kind`.
    #[must_use]
    pub fn has_family(&self, kind: FactKind) -> bool {
        self.facts.contains_key(&kind)
    }

    /// Shorthand for `get(FactKind::Gen, node)`.
    #[must_use]
    pub fn gen_set(&self, node: CfgNode) -> &FactSet<T> {
        self.get(FactKind::Gen, node)
    }

    /// Shorthand for `get(FactKind::Kill, node)`.
    #[must_use]
    pub fn kill_set(&self, node: CfgNode) -> &FactSet<T> {
        self.get(FactKind::Kill, node)
    }

    /// Shorthand for `get(FactKind::In, node)`.
    #[must_use]
    pub fn in_set(&self, node: CfgNode) -> &FactSet<T> {
        self.get(FactKind::In, node)
    }

    /// Shorthand for `get(FactKind::Out, node)`.
    #[must_use]
    pub fn out_set(&self, node: CfgNode) -> &FactSet<T> {
        self.get(FactKind::Out, node)
    }
}
