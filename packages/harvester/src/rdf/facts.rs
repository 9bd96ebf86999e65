//! Facts extracted from one page.

use std::collections::{BTreeMap, HashSet};

use super::term::{Object, Term, Triple};

/// Facts from a single document, in the order they were discovered.
///
/// Duplicates are dropped on insertion; discovery order is kept so that
/// "first subject" and "first value" questions have a stable answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactSet {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    prefixes: BTreeMap<String, String>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triple: Triple) {
        if self.seen.insert(triple.clone()) {
            self.triples.push(triple);
        }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Subject of the first discovered fact.
    pub fn first_subject(&self) -> Option<&Term> {
        self.triples.first().map(|t| &t.subject)
    }

    /// Facts about `root`: its own triples plus those of every blank node
    /// reachable from it. Discovery order and prefixes are kept.
    pub fn closure(&self, root: &Term) -> FactSet {
        let mut reachable: HashSet<&Term> = HashSet::from([root]);
        let mut pending = vec![root];
        while let Some(subject) = pending.pop() {
            for triple in self.triples.iter().filter(|t| &t.subject == subject) {
                if let Some(node) = triple.object.as_node().filter(|n| n.is_blank()) {
                    if reachable.insert(node) {
                        pending.push(node);
                    }
                }
            }
        }

        let mut closure = FactSet {
            prefixes: self.prefixes.clone(),
            ..FactSet::default()
        };
        for triple in self.triples.iter().filter(|t| reachable.contains(&t.subject)) {
            closure.push(triple.clone());
        }
        closure
    }

    /// Objects of `predicate` in discovery order.
    pub fn objects<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Object> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Record a prefix declared by the document.
    pub fn declare_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }
}

impl IntoIterator for FactSet {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}
