//! Minimal labeled-graph store for catalog facts.
//!
//! - [`term`]: subjects, objects, literals and triples
//! - [`graph`]: ordered triple set with prefix bookkeeping
//! - [`facts`]: facts extracted from a single page, in document order
//! - [`vocab`]: IRIs of the vocabularies the catalog uses

pub mod facts;
pub mod graph;
pub mod term;
pub mod vocab;

pub use facts::FactSet;
pub use graph::Graph;
pub use term::{Literal, Object, Term, Triple};
