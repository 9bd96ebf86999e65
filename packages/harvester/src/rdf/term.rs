//! RDF terms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node that can be the subject of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Iri(String),
    Blank(String),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Blank(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

/// A literal scalar. Datatype and language are mutually exclusive in
/// practice; the extractor never sets both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.lexical)?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")?;
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^<{datatype}>")?;
        }
        Ok(())
    }
}

/// The object position of a fact: another entity or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Object {
    Node(Term),
    Literal(Literal),
}

impl Object {
    pub fn as_node(&self) -> Option<&Term> {
        match self {
            Self::Node(term) => Some(term),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Node(_) => None,
            Self::Literal(literal) => Some(literal),
        }
    }
}

impl From<Term> for Object {
    fn from(term: Term) -> Self {
        Self::Node(term)
    }
}

impl From<Literal> for Object {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(term) => term.fmt(f),
            Self::Literal(literal) => literal.fmt(f),
        }
    }
}

/// A subject–predicate–object fact. Predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: impl Into<Object>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Apply `f` to every blank node in subject and object position.
    #[must_use]
    pub fn map_blanks(self, f: impl Fn(&str) -> String) -> Self {
        let relabel = |term: Term| match term {
            Term::Blank(label) => Term::Blank(f(&label)),
            iri => iri,
        };
        let object = match self.object {
            Object::Node(term) => Object::Node(relabel(term)),
            literal => literal,
        };
        Self {
            subject: relabel(self.subject),
            predicate: self.predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_display() {
        let triple = Triple::new(
            Term::iri("https://spdx.org/licenses/MIT"),
            "http://spdx.org/rdf/terms#licenseId",
            Literal::plain("MIT"),
        );
        assert_eq!(
            triple.to_string(),
            r#"<https://spdx.org/licenses/MIT> <http://spdx.org/rdf/terms#licenseId> "MIT" ."#
        );
    }

    #[test]
    fn test_literal_display_language() {
        let literal = Literal {
            lexical: "MIT License".to_string(),
            datatype: None,
            language: Some("en".to_string()),
        };
        assert_eq!(literal.to_string(), r#""MIT License"@en"#);
    }

    #[test]
    fn test_map_blanks_touches_only_blank_nodes() {
        let triple = Triple::new(Term::blank("b0"), "urn:p", Term::blank("b1"));
        let mapped = triple.map_blanks(|label| format!("MIT.{label}"));
        assert_eq!(mapped.subject, Term::blank("MIT.b0"));
        assert_eq!(mapped.object, Object::Node(Term::blank("MIT.b1")));

        let triple = Triple::new(Term::iri("urn:s"), "urn:p", Literal::plain("b0"));
        let mapped = triple.clone().map_blanks(|label| format!("x.{label}"));
        assert_eq!(mapped, triple);
    }
}
