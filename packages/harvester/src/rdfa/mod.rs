//! RDFa fact extraction from HTML pages.
//!
//! Implements the subset of RDFa 1.1 Core processing that catalog pages use:
//! prefix declarations (`xmlns:*`, `prefix`, `vocab`), subject resolution
//! (`about`, `resource`, `href`, `src`), `typeof`, `rel`/`rev` including
//! hanging relations, and `property` values from `content`, `datatype` or
//! element text. XML literals and RDFa lists are out of scope; an
//! `rdf:XMLLiteral` datatype yields a typed literal of the element text.
//!
//! # Example
//!
//! ```
//! use license_harvester::rdfa::extract_facts;
//!
//! let html = r#"<html><body prefix="spdx: http://spdx.org/rdf/terms#">
//!   <div about="./MIT" typeof="spdx:ListedLicense">
//!     <code property="spdx:licenseId">MIT</code>
//!   </div>
//! </body></html>"#;
//!
//! let facts = extract_facts(html, "https://spdx.org/licenses/MIT");
//! assert_eq!(facts.len(), 2);
//! ```

mod context;

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::rdf::vocab::RDF_TYPE;
use crate::rdf::{FactSet, Literal, Object, Term, Triple};
use context::{Context, Direction, Hanging};

/// Extract all RDFa facts from an HTML document.
///
/// `page_url` is the base for relative IRIs unless the document declares a
/// `<base href>`. Facts are returned in document order.
pub fn extract_facts(html: &str, page_url: &str) -> FactSet {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    let mut extractor = Extractor::default();
    let context = Context::initial(base);
    extractor.process(document.root_element(), &context, true);
    extractor.facts
}

/// Resolve the document base from `<base href>` and the page URL.
fn document_base(document: &Html, page_url: &str) -> Option<Url> {
    let page = Url::parse(page_url).ok();
    let selector = match Selector::parse("base[href]") {
        Ok(s) => s,
        Err(_) => return page,
    };
    let Some(href) = document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
    else {
        return page;
    };
    match &page {
        Some(page) => page.join(href.trim()).ok().or(Some(page.clone())),
        None => Url::parse(href.trim()).ok(),
    }
}

#[derive(Default)]
struct Extractor {
    facts: FactSet,
    next_blank: usize,
    document_blanks: HashMap<String, Term>,
}

impl Extractor {
    fn fresh_blank(&mut self) -> Term {
        let term = Term::blank(format!("b{}", self.next_blank));
        self.next_blank += 1;
        term
    }

    /// Map a `_:label` written in the document to a generated blank node,
    /// so authored labels never collide with generated ones.
    fn document_blank(&mut self, label: &str) -> Term {
        if let Some(term) = self.document_blanks.get(label) {
            return term.clone();
        }
        let term = self.fresh_blank();
        self.document_blanks.insert(label.to_string(), term.clone());
        term
    }

    fn resolve_resource(&mut self, value: &str, context: &Context) -> Option<Term> {
        let value = value.trim();
        if let Some(safe) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            return match safe.strip_prefix("_:") {
                Some(label) => Some(self.document_blank(label)),
                None => context.expand_curie(safe).map(Term::Iri),
            };
        }
        if let Some(label) = value.strip_prefix("_:") {
            return Some(self.document_blank(label));
        }
        if let Some(iri) = context.expand_curie(value) {
            return Some(Term::Iri(iri));
        }
        context.resolve_iri(value).map(Term::Iri)
    }

    fn process(&mut self, element: ElementRef<'_>, parent: &Context, is_root: bool) {
        let el = element.value();
        let mut local = parent.clone();

        for (name, value) in el.attrs() {
            if let Some(prefix) = name.strip_prefix("xmlns:") {
                local.declare_prefix(prefix, value);
                self.facts.declare_prefix(prefix.to_ascii_lowercase(), value.trim());
            }
        }
        if let Some(declarations) = el.attr("prefix") {
            for (prefix, namespace) in context::parse_prefix_attribute(declarations) {
                local.declare_prefix(prefix, namespace);
                self.facts.declare_prefix(prefix.to_ascii_lowercase(), namespace);
            }
        }
        if let Some(vocab) = el.attr("vocab") {
            local.vocab = local.resolve_iri(vocab);
        }
        if let Some(language) = el.attr("xml:lang").or_else(|| el.attr("lang")) {
            let language = language.trim();
            local.language = (!language.is_empty()).then(|| language.to_string());
        }

        let rels = el.attr("rel").map(|v| local.resolve_predicates(v)).unwrap_or_default();
        let revs = el.attr("rev").map(|v| local.resolve_predicates(v)).unwrap_or_default();
        let properties = el
            .attr("property")
            .map(|v| local.resolve_predicates(v))
            .unwrap_or_default();
        let types = el.attr("typeof").map(|v| local.resolve_predicates(v));
        let content = el.attr("content");
        let datatype = el.attr("datatype").map(str::trim);

        let about = match el.attr("about") {
            Some(v) => self.resolve_resource(v, &local),
            None => None,
        };
        let resource = match el.attr("resource") {
            Some(v) => self.resolve_resource(v, &local),
            None => el
                .attr("href")
                .or_else(|| el.attr("src"))
                .and_then(|v| local.resolve_iri(v))
                .map(Term::Iri),
        };

        let has_relations = !rels.is_empty() || !revs.is_empty();
        let has_property = !properties.is_empty();
        let has_typeof = types.is_some();
        let root_subject = is_root.then(|| local.base_term()).flatten();

        let mut skip = false;
        let mut typed_resource: Option<Term> = None;
        let mut current_object: Option<Term> = None;

        let new_subject: Term = if !has_relations {
            if has_property && content.is_none() && datatype.is_none() {
                let subject = match about.clone().or_else(|| root_subject.clone()) {
                    Some(subject) => subject,
                    None => parent.parent_object.clone(),
                };
                if has_typeof {
                    let typed = match about.clone().or_else(|| root_subject.clone()) {
                        Some(t) => t,
                        None => match resource.clone() {
                            Some(t) => t,
                            None => self.fresh_blank(),
                        },
                    };
                    current_object = Some(typed.clone());
                    typed_resource = Some(typed);
                }
                subject
            } else {
                let subject = match about
                    .clone()
                    .or_else(|| resource.clone())
                    .or_else(|| root_subject.clone())
                {
                    Some(subject) => subject,
                    None if has_typeof => self.fresh_blank(),
                    None => {
                        skip = !has_property;
                        parent.parent_object.clone()
                    }
                };
                if has_typeof {
                    typed_resource = Some(subject.clone());
                }
                subject
            }
        } else {
            let subject = match about.clone().or_else(|| root_subject.clone()) {
                Some(subject) => subject,
                None => parent.parent_object.clone(),
            };
            if has_typeof && about.is_some() {
                typed_resource = about.clone();
            }
            current_object = match resource.clone() {
                Some(object) => Some(object),
                None if has_typeof && about.is_none() => Some(self.fresh_blank()),
                None => None,
            };
            if has_typeof && about.is_none() {
                typed_resource = current_object.clone();
            }
            subject
        };

        if let (Some(typed), Some(types)) = (&typed_resource, &types) {
            for class in types {
                self.facts
                    .push(Triple::new(typed.clone(), RDF_TYPE, Term::Iri(class.clone())));
            }
        }

        let mut hanging = Vec::new();
        if has_relations {
            match &current_object {
                Some(object) => {
                    for rel in &rels {
                        self.facts
                            .push(Triple::new(new_subject.clone(), rel.clone(), object.clone()));
                    }
                    for rev in &revs {
                        self.facts
                            .push(Triple::new(object.clone(), rev.clone(), new_subject.clone()));
                    }
                }
                None => {
                    hanging.extend(rels.iter().map(|p| Hanging {
                        predicate: p.clone(),
                        direction: Direction::Forward,
                    }));
                    hanging.extend(revs.iter().map(|p| Hanging {
                        predicate: p.clone(),
                        direction: Direction::Reverse,
                    }));
                    current_object = Some(self.fresh_blank());
                }
            }
        }

        for property in &properties {
            let object = self.property_value(
                element,
                &local,
                content,
                datatype,
                has_relations,
                resource.as_ref(),
                typed_resource.as_ref().filter(|_| about.is_none()),
            );
            self.facts
                .push(Triple::new(new_subject.clone(), property.clone(), object));
        }

        if !skip {
            for pending in &parent.hanging {
                let triple = match pending.direction {
                    Direction::Forward => Triple::new(
                        parent.parent_subject.clone(),
                        pending.predicate.clone(),
                        new_subject.clone(),
                    ),
                    Direction::Reverse => Triple::new(
                        new_subject.clone(),
                        pending.predicate.clone(),
                        parent.parent_subject.clone(),
                    ),
                };
                self.facts.push(triple);
            }
        }

        let child_context = if skip {
            Context {
                parent_subject: parent.parent_subject.clone(),
                parent_object: parent.parent_object.clone(),
                hanging: parent.hanging.clone(),
                ..local
            }
        } else {
            Context {
                parent_object: current_object.unwrap_or_else(|| new_subject.clone()),
                parent_subject: new_subject,
                hanging,
                ..local
            }
        };

        for child in element.children() {
            if let Some(child) = ElementRef::wrap(child) {
                self.process(child, &child_context, false);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn property_value(
        &self,
        element: ElementRef<'_>,
        context: &Context,
        content: Option<&str>,
        datatype: Option<&str>,
        has_relations: bool,
        resource: Option<&Term>,
        typed_resource: Option<&Term>,
    ) -> Object {
        let text = || element.text().collect::<String>();

        match datatype {
            Some(datatype) if !datatype.is_empty() => {
                let lexical = content.map_or_else(text, str::to_string);
                let datatype = context
                    .resolve_predicates(datatype)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| datatype.to_string());
                Object::Literal(Literal {
                    lexical,
                    datatype: Some(datatype),
                    language: None,
                })
            }
            Some(_) => self.plain_literal(content.map_or_else(text, str::to_string), context),
            None => {
                if let Some(content) = content {
                    return self.plain_literal(content.to_string(), context);
                }
                if !has_relations {
                    if let Some(resource) = resource {
                        return Object::Node(resource.clone());
                    }
                }
                if let Some(typed) = typed_resource {
                    return Object::Node(typed.clone());
                }
                self.plain_literal(text(), context)
            }
        }
    }

    fn plain_literal(&self, lexical: String, context: &Context) -> Object {
        Object::Literal(Literal {
            lexical,
            datatype: None,
            language: context.language.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::vocab::{LICENSE_ID, LICENSE_LIST_VERSION, SPDX_NS};
    use pretty_assertions::assert_eq;

    const PAGE: &str = "https://spdx.org/licenses/";

    fn spdx(local: &str) -> String {
        format!("{SPDX_NS}{local}")
    }

    fn literal(value: &str) -> Object {
        Object::Literal(Literal::plain(value))
    }

    #[test]
    fn test_property_text_with_xmlns_prefix() {
        let html = r#"<html xmlns:spdx="http://spdx.org/rdf/terms#"><body>
            <p>Version: <span property="spdx:licenseListVersion">3.7</span></p>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);

        assert_eq!(
            facts.iter().cloned().collect::<Vec<_>>(),
            vec![Triple::new(
                Term::iri(PAGE),
                LICENSE_LIST_VERSION,
                Literal::plain("3.7")
            )]
        );
        assert_eq!(
            facts.prefixes().get("spdx").map(String::as_str),
            Some(SPDX_NS)
        );
    }

    #[test]
    fn test_about_and_typeof_set_subject() {
        let html = r#"<html><body prefix="spdx: http://spdx.org/rdf/terms#">
            <table><tr>
              <td about="./MIT" typeof="spdx:ListedLicense">
                <code property="spdx:licenseId">MIT</code>
              </td>
            </tr></table>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        let mit = Term::iri("https://spdx.org/licenses/MIT");

        assert_eq!(facts.first_subject(), Some(&mit));
        assert_eq!(
            facts.iter().cloned().collect::<Vec<_>>(),
            vec![
                Triple::new(mit.clone(), RDF_TYPE, Term::iri(spdx("ListedLicense"))),
                Triple::new(mit, LICENSE_ID, Literal::plain("MIT")),
            ]
        );
    }

    #[test]
    fn test_content_attribute_overrides_text() {
        let html = r#"<html><body prefix="spdx: http://spdx.org/rdf/terms#">
            <div about="MIT"><meta property="spdx:isOsiApproved" content="true"/>
            <span property="spdx:name" content="MIT License">The MIT License</span></div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        let values: Vec<_> = facts.iter().map(|t| t.object.clone()).collect();
        assert_eq!(values, vec![literal("true"), literal("MIT License")]);
    }

    #[test]
    fn test_datatype_and_language() {
        let html = r#"<html lang="en"><body prefix="spdx: http://spdx.org/rdf/terms#">
            <div about="MIT">
              <span property="spdx:isOsiApproved" datatype="xsd:boolean">true</span>
              <span property="spdx:name">MIT License</span>
              <span property="spdx:comment" xml:lang="">plain</span>
            </div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        let objects: Vec<_> = facts.iter().map(|t| t.object.clone()).collect();

        assert_eq!(
            objects,
            vec![
                Object::Literal(Literal {
                    lexical: "true".to_string(),
                    datatype: Some("http://www.w3.org/2001/XMLSchema#boolean".to_string()),
                    language: None,
                }),
                Object::Literal(Literal {
                    lexical: "MIT License".to_string(),
                    datatype: None,
                    language: Some("en".to_string()),
                }),
                literal("plain"),
            ]
        );
    }

    #[test]
    fn test_rel_with_href() {
        let html = r#"<html><body>
            <div about="MIT">
              <a rel="rdfs:seeAlso" href="https://opensource.org/licenses/MIT">OSI</a>
            </div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        assert_eq!(
            facts.iter().cloned().collect::<Vec<_>>(),
            vec![Triple::new(
                Term::iri("https://spdx.org/licenses/MIT"),
                "http://www.w3.org/2000/01/rdf-schema#seeAlso",
                Term::iri("https://opensource.org/licenses/MIT"),
            )]
        );
    }

    #[test]
    fn test_property_with_href_yields_resource() {
        let html = r#"<html><body>
            <div about="MIT"><a property="rdfs:seeAlso" href="/licenses/MIT.json">json</a></div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        let triple = facts.iter().next().unwrap();
        assert_eq!(
            triple.object,
            Object::Node(Term::iri("https://spdx.org/licenses/MIT.json"))
        );
    }

    #[test]
    fn test_hanging_rel_completed_by_children() {
        let html = r#"<html><body prefix="spdx: http://spdx.org/rdf/terms#">
            <div about="MIT" rel="spdx:crossRef">
              <div typeof="spdx:CrossRef">
                <span property="spdx:url">https://opensource.org/licenses/MIT</span>
              </div>
            </div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        let triples: Vec<_> = facts.iter().cloned().collect();
        let mit = Term::iri("https://spdx.org/licenses/MIT");

        assert_eq!(triples.len(), 3);
        let Term::Blank(_) = &triples[0].subject else {
            panic!("expected blank typed resource, got {}", triples[0]);
        };
        let cross_ref = triples[0].subject.clone();
        assert_eq!(
            triples,
            vec![
                Triple::new(cross_ref.clone(), RDF_TYPE, Term::iri(spdx("CrossRef"))),
                Triple::new(mit, spdx("crossRef"), cross_ref.clone()),
                Triple::new(
                    cross_ref,
                    spdx("url"),
                    Literal::plain("https://opensource.org/licenses/MIT")
                ),
            ]
        );
    }

    #[test]
    fn test_nested_subject_inherited_by_descendants() {
        let html = r#"<html><body prefix="spdx: http://spdx.org/rdf/terms#">
            <div about="Apache-2.0"><section><p>
              <span property="spdx:licenseId">Apache-2.0</span>
            </p></section></div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        assert_eq!(
            facts.first_subject(),
            Some(&Term::iri("https://spdx.org/licenses/Apache-2.0"))
        );
    }

    #[test]
    fn test_base_element_changes_resolution() {
        let html = r#"<html><head><base href="https://mirror.example/spdx/"></head><body>
            <div about="MIT"><span property="rdfs:label">MIT</span></div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        assert_eq!(
            facts.first_subject(),
            Some(&Term::iri("https://mirror.example/spdx/MIT"))
        );
    }

    #[test]
    fn test_vocab_terms() {
        let html = r#"<html><body vocab="http://schema.org/">
            <div about="MIT" typeof="CreativeWork"><span property="name">MIT License</span></div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        let predicates: Vec<_> = facts.iter().map(|t| t.predicate.as_str()).collect();
        assert_eq!(predicates, vec![RDF_TYPE, "http://schema.org/name"]);
    }

    #[test]
    fn test_unresolvable_terms_are_ignored() {
        let html = r#"<html><head><link rel="stylesheet" href="style.css"/></head><body>
            <span property="thing">x</span>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        assert!(facts.is_empty(), "unexpected facts: {facts:?}");
    }

    #[test]
    fn test_document_blank_nodes_are_shared() {
        let html = r#"<html><body>
            <div about="_:x"><span property="rdfs:label">one</span></div>
            <div about="[_:x]"><span property="rdfs:comment">two</span></div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        let subjects: Vec<_> = facts.iter().map(|t| t.subject.clone()).collect();
        assert_eq!(subjects.len(), 2);
        assert!(subjects[0].is_blank());
        assert_eq!(subjects[0], subjects[1]);
    }

    #[test]
    fn test_duplicate_facts_collapse() {
        let html = r#"<html><body prefix="spdx: http://spdx.org/rdf/terms#">
            <div about="./"><code property="spdx:licenseId">MIT</code></div>
            <div about="./"><code property="spdx:licenseId">MIT</code></div>
        </body></html>"#;
        let facts = extract_facts(html, PAGE);
        assert_eq!(facts.len(), 1);
    }
}
