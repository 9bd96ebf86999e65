//! Core data types for the harvester.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{HarvesterError, Result};
use crate::rdf::vocab::{LICENSE_LIST_VERSION, MEMBER_LICENSE, RDFS_NS, RDF_NS, SPDX_NS};
use crate::rdf::{FactSet, Graph, Literal, Object, Term, Triple};

/// What the index page tells us about the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIndex {
    /// Catalog version, e.g. `"3.7"`.
    pub version: String,
    /// Every license identifier listed on the index page.
    pub identifiers: BTreeSet<String>,
}

/// Facts retrieved for one license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseFacts {
    pub identifier: String,
    /// First subject discovered on the detail page.
    pub root: Term,
    pub facts: FactSet,
}

/// The aggregate graph: the catalog root entity, its version, and every
/// member license with its full description.
///
/// Only grows: facts are added, never changed or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGraph {
    root: Term,
    graph: Graph,
}

impl CatalogGraph {
    /// Create the root entity at `catalog_url` carrying `version`.
    pub fn new(catalog_url: &str, version: &str) -> Self {
        let root = Term::iri(catalog_url);
        let mut graph = Graph::new();
        graph.set_prefix("rdf", RDF_NS);
        graph.set_prefix("rdfs", RDFS_NS);
        graph.set_prefix("spdx", SPDX_NS);
        graph.insert(Triple::new(
            root.clone(),
            LICENSE_LIST_VERSION,
            Literal::plain(version),
        ));
        Self { root, graph }
    }

    /// Attach a license under the root via a member edge.
    ///
    /// The license facts are copied in, except any about the catalog root
    /// itself. Blank nodes are relabelled `<identifier>.<label>` so pages
    /// never share one. Returns `false` if no new member edge was added:
    /// the edge already existed or the license root is the catalog root.
    pub fn add_member(&mut self, license: LicenseFacts) -> bool {
        let LicenseFacts {
            identifier,
            root,
            facts,
        } = license;
        let relabel = |label: &str| format!("{identifier}.{label}");

        for (prefix, namespace) in facts.prefixes() {
            if self.graph.prefix(prefix).is_none() {
                self.graph.set_prefix(prefix.clone(), namespace.clone());
            }
        }
        let catalog_root = &self.root;
        self.graph.extend(
            facts
                .into_iter()
                .filter(|triple| &triple.subject != catalog_root)
                .map(|triple| triple.map_blanks(relabel)),
        );

        let member = match root {
            Term::Blank(label) => Term::Blank(relabel(&label)),
            iri => iri,
        };
        if member == self.root {
            return false;
        }
        self.graph
            .insert(Triple::new(self.root.clone(), MEMBER_LICENSE, member))
    }

    pub fn root(&self) -> &Term {
        &self.root
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Version literals on the root. Exactly one for a well-formed graph.
    pub fn versions(&self) -> Vec<&str> {
        self.graph
            .objects_of(&self.root, LICENSE_LIST_VERSION)
            .filter_map(Object::as_literal)
            .map(|l| l.lexical.as_str())
            .collect()
    }

    /// The catalog version, if exactly one is present.
    pub fn version(&self) -> Option<&str> {
        match self.versions().as_slice() {
            [version] => Some(*version),
            _ => None,
        }
    }

    /// The catalog version, failing unless exactly one is present.
    pub fn checked_version(&self) -> Result<&str> {
        match self.versions().as_slice() {
            [version] => Ok(*version),
            versions => Err(HarvesterError::InconsistentCatalog {
                versions: versions.len(),
            }),
        }
    }

    /// Member license roots.
    pub fn members(&self) -> BTreeSet<&Term> {
        self.graph
            .objects_of(&self.root, MEMBER_LICENSE)
            .filter_map(Object::as_node)
            .collect()
    }

    pub fn member_count(&self) -> usize {
        self.members().len()
    }

    /// Facts describing one member license.
    pub fn member_facts<'a>(&'a self, member: &'a Term) -> impl Iterator<Item = &'a Triple> + 'a {
        self.graph.describe(member)
    }
}

/// Outcome of a completed synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub version: String,
    pub license_count: usize,
    pub fact_count: usize,
    pub output: PathBuf,
}
