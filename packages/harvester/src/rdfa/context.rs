//! RDFa evaluation context.

use std::collections::HashMap;

use url::Url;

use crate::rdf::vocab::INITIAL_PREFIXES;
use crate::rdf::Term;

/// Namespace of the empty prefix (`:term`).
const DEFAULT_PREFIX_NS: &str = "http://www.w3.org/1999/xhtml/vocab#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Forward,
    Reverse,
}

/// A `rel`/`rev` predicate waiting for a descendant to supply its object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Hanging {
    pub predicate: String,
    pub direction: Direction,
}

/// State inherited from ancestors while walking the DOM.
#[derive(Debug, Clone)]
pub(super) struct Context {
    pub base: Option<Url>,
    pub parent_subject: Term,
    pub parent_object: Term,
    pub prefixes: HashMap<String, String>,
    pub vocab: Option<String>,
    pub language: Option<String>,
    pub hanging: Vec<Hanging>,
}

impl Context {
    pub fn initial(base: Option<Url>) -> Self {
        let document = Term::Iri(base.as_ref().map(Url::to_string).unwrap_or_default());
        Self {
            base,
            parent_subject: document.clone(),
            parent_object: document,
            prefixes: INITIAL_PREFIXES
                .iter()
                .map(|(p, ns)| (p.to_string(), ns.to_string()))
                .collect(),
            vocab: None,
            language: None,
            hanging: Vec::new(),
        }
    }

    /// The document itself as a subject.
    pub fn base_term(&self) -> Option<Term> {
        self.base.as_ref().map(|b| Term::Iri(b.to_string()))
    }

    /// Prefixes are case-insensitive.
    pub fn declare_prefix(&mut self, prefix: &str, namespace: &str) {
        self.prefixes
            .insert(prefix.to_ascii_lowercase(), namespace.trim().to_string());
    }

    /// Resolve a possibly relative IRI against the base.
    pub fn resolve_iri(&self, value: &str) -> Option<String> {
        let value = value.trim();
        match &self.base {
            Some(base) => base.join(value).ok().map(String::from),
            None => Url::parse(value).ok().map(String::from),
        }
    }

    /// Expand `prefix:reference` using declared prefixes.
    ///
    /// Returns `None` for undeclared prefixes, blank node labels and
    /// strings without a colon.
    pub fn expand_curie(&self, value: &str) -> Option<String> {
        let (prefix, reference) = value.split_once(':')?;
        if prefix == "_" || reference.starts_with("//") {
            return None;
        }
        if prefix.is_empty() {
            return Some(format!("{DEFAULT_PREFIX_NS}{reference}"));
        }
        self.prefixes
            .get(&prefix.to_ascii_lowercase())
            .map(|ns| format!("{ns}{reference}"))
    }

    /// Resolve a whitespace-separated list of terms, CURIEs or absolute
    /// IRIs (the value of `property`, `rel`, `rev`, `typeof`, `datatype`).
    /// Tokens that resolve to nothing are dropped.
    pub fn resolve_predicates(&self, value: &str) -> Vec<String> {
        value
            .split_whitespace()
            .filter_map(|token| self.resolve_predicate(token))
            .collect()
    }

    fn resolve_predicate(&self, token: &str) -> Option<String> {
        if token.contains(':') {
            if token.starts_with("_:") {
                return None;
            }
            return self
                .expand_curie(token)
                .or_else(|| Url::parse(token).ok().map(|_| token.to_string()));
        }
        self.vocab.as_ref().map(|vocab| format!("{vocab}{token}"))
    }
}

/// Parse an RDFa `prefix` attribute: `"p1: iri1 p2: iri2"`.
pub(super) fn parse_prefix_attribute(value: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut tokens = value.split_whitespace();
    while let Some(token) = tokens.next() {
        let Some(prefix) = token.strip_suffix(':') else {
            continue;
        };
        if let Some(namespace) = tokens.next() {
            if !prefix.is_empty() && prefix != "_" {
                pairs.push((prefix, namespace));
            }
        }
    }
    pairs
}
