//! Vocabulary IRIs.

/// RDF syntax namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// RDF schema namespace.
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// XML schema datatypes namespace.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// SPDX terms namespace.
pub const SPDX_NS: &str = "http://spdx.org/rdf/terms#";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// `spdx:licenseId`: one per listed license on the index page.
pub const LICENSE_ID: &str = "http://spdx.org/rdf/terms#licenseId";

/// `spdx:licenseListVersion`: the catalog version on the index page.
pub const LICENSE_LIST_VERSION: &str = "http://spdx.org/rdf/terms#licenseListVersion";

/// `spdx:license`: edge from the catalog root to each member license.
pub const MEMBER_LICENSE: &str = "http://spdx.org/rdf/terms#license";

/// Prefixes of the RDFa initial context that the extractor recognizes
/// without a declaration in the page.
pub const INITIAL_PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("xsd", XSD_NS),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("dc", "http://purl.org/dc/terms/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("schema", "http://schema.org/"),
    ("xhv", "http://www.w3.org/1999/xhtml/vocab#"),
];
