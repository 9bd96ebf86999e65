//! End-to-end integration tests for the harvester pipeline.
//!
//! Runs the complete pipeline from index page to snapshot file using
//! fixture pages modelled on SPDX license list 3.7.

use std::fs;
use std::path::Path;
use std::time::Duration;

use license_harvester::harvester::NoopObserver;
use license_harvester::http::{Page, PageFetcher};
use license_harvester::rate_limit::RateLimiter;
use license_harvester::rdf::vocab::{LICENSE_ID, LICENSE_LIST_VERSION, MEMBER_LICENSE, RDF_TYPE};
use license_harvester::rdf::{Object, Term};
use license_harvester::rdfa::extract_facts;
use license_harvester::snapshot::read_snapshot;
use license_harvester::{sync_to_file, HarvesterError, SyncConfig};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;

const CATALOG_URL: &str = "https://spdx.org/licenses/";

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("spdx")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Serves fixture pages for the catalog URL and its license pages.
struct FixtureFetcher;

impl PageFetcher for FixtureFetcher {
    fn fetch(&self, url: &str) -> license_harvester::Result<Page> {
        let name = match url.strip_prefix(CATALOG_URL) {
            Some("") => "index.html".to_string(),
            Some(id) => format!("{id}.html"),
            None => panic!("unexpected url {url}"),
        };
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/spdx")
            .join(&name);
        let (status, body) = match fs::read_to_string(path) {
            Ok(body) => (StatusCode::OK, body),
            Err(_) => (StatusCode::NOT_FOUND, String::new()),
        };
        Ok(Page {
            url: url.to_string(),
            status,
            body,
        })
    }
}

fn literal_values<'a>(objects: impl Iterator<Item = &'a Object>) -> Vec<&'a str> {
    objects
        .filter_map(Object::as_literal)
        .map(|l| l.lexical.trim())
        .collect()
}

#[test]
fn test_index_fixture() {
    let facts = extract_facts(&load_fixture("index.html"), CATALOG_URL);

    assert_eq!(literal_values(facts.objects(LICENSE_LIST_VERSION)), vec!["3.7"]);
    assert_eq!(
        literal_values(facts.objects(LICENSE_ID)),
        vec!["MIT", "apache-2.0", "GPL-2.0"]
    );
}

#[test]
fn test_license_fixture_root_and_facts() {
    let facts = extract_facts(&load_fixture("MIT.html"), "https://spdx.org/licenses/MIT");
    let root = Term::iri("https://spdx.org/licenses/MIT");

    assert_eq!(facts.first_subject(), Some(&root));

    let predicates: Vec<&str> = facts
        .iter()
        .filter(|t| t.subject == root)
        .map(|t| t.predicate.as_str())
        .collect();
    for expected in [
        RDF_TYPE,
        "http://spdx.org/rdf/terms#name",
        "http://spdx.org/rdf/terms#licenseId",
        "http://spdx.org/rdf/terms#isOsiApproved",
        "http://spdx.org/rdf/terms#crossRef",
        "http://spdx.org/rdf/terms#licenseText",
        "http://www.w3.org/2000/01/rdf-schema#seeAlso",
    ] {
        assert!(predicates.contains(&expected), "missing {expected}");
    }

    // the cross reference is an anonymous node hanging off the root
    let cross_ref = facts
        .iter()
        .find(|t| t.predicate == "http://spdx.org/rdf/terms#crossRef")
        .and_then(|t| t.object.as_node())
        .expect("crossRef object");
    assert!(cross_ref.is_blank());
    assert!(facts.iter().any(|t| &t.subject == cross_ref
        && t.predicate == "http://spdx.org/rdf/terms#url"));
}

#[test]
fn test_full_pipeline_writes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("licenses-3.7.bin");
    let config = SyncConfig::default().with_request_delay(Duration::ZERO);

    let summary = sync_to_file(
        &FixtureFetcher,
        &RateLimiter::new(Duration::ZERO),
        &config,
        &output,
        &mut NoopObserver,
    )
    .unwrap();

    assert_eq!(summary.version, "3.7");
    assert_eq!(summary.license_count, 3);
    assert_eq!(summary.output, output);

    let catalog = read_snapshot(&output).unwrap();
    assert_eq!(catalog.version(), Some("3.7"));
    assert_eq!(catalog.graph().len(), summary.fact_count);

    assert_eq!(catalog.member_count(), 3);
    for id in ["MIT", "apache-2.0", "GPL-2.0"] {
        let root = Term::iri(format!("{CATALOG_URL}{id}"));
        assert!(catalog.members().contains(&root), "missing member {id}");
        assert!(catalog.member_facts(&root).any(|t| t.predicate == LICENSE_ID));
    }

    // only the root carries member edges
    assert!(catalog
        .graph()
        .iter()
        .filter(|t| t.predicate == MEMBER_LICENSE)
        .all(|t| &t.subject == catalog.root()));

    // blank nodes are scoped by the license they came from
    let blanks: Vec<&Term> = catalog
        .graph()
        .subjects()
        .into_iter()
        .filter(|t| t.is_blank())
        .collect();
    assert_eq!(blanks.len(), 1);
    assert!(blanks[0].to_string().contains("MIT."));
}

#[test]
fn test_pipeline_refuses_existing_destination() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("licenses.bin");
    fs::write(&output, b"keep me").unwrap();

    let result = sync_to_file(
        &FixtureFetcher,
        &RateLimiter::new(Duration::ZERO),
        &SyncConfig::default(),
        &output,
        &mut NoopObserver,
    );

    assert!(matches!(result, Err(HarvesterError::DestinationExists(_))));
    assert_eq!(fs::read(&output).unwrap(), b"keep me");
}

#[test]
fn test_pipeline_aborts_on_missing_license_page() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("licenses.bin");
    let config = SyncConfig::default().with_request_delay(Duration::ZERO);

    // index resolves, every detail page is gone
    struct MissingDetails;
    impl PageFetcher for MissingDetails {
        fn fetch(&self, url: &str) -> license_harvester::Result<Page> {
            let missing = url != CATALOG_URL;
            Ok(Page {
                url: url.to_string(),
                status: if missing {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::OK
                },
                body: if missing {
                    String::new()
                } else {
                    load_fixture("index.html")
                },
            })
        }
    }

    let result = sync_to_file(
        &MissingDetails,
        &RateLimiter::new(Duration::ZERO),
        &config,
        &output,
        &mut NoopObserver,
    );

    assert!(matches!(
        result,
        Err(HarvesterError::Retrieval {
            status: Some(StatusCode::NOT_FOUND),
            ..
        })
    ));
    assert!(!output.exists());
}
