//! Reader for the subset of the OBO flat file format needed for type checks.
//!
//! Only `[Term]` stanzas matter: their `id`, `name` and `is_a` tags are kept,
//! terms flagged `is_obsolete: true` are left out. Header tags, other stanza
//! kinds such as `[Typedef]` and every other tag are skipped.

use std::io::BufRead;

use crate::errors::OntologyLoadError;
use crate::term_graph::{Term, TermGraph};

#[derive(Debug, PartialEq)]
enum Section {
    Header,
    Term,
    Other,
}

#[derive(Debug, Default)]
struct PendingTerm {
    id: Option<String>,
    name: Option<String>,
    parents: Vec<String>,
    obsolete: bool,
}

impl PendingTerm {
    fn finish(self, line: usize, graph: &mut TermGraph) -> Result<(), OntologyLoadError> {
        let id = self.id.ok_or(OntologyLoadError::MissingId { line })?;
        if self.obsolete {
            return Ok(());
        }
        graph.insert(Term {
            id,
            name: self.name,
            parents: self.parents,
        })
    }
}

/// Drop a trailing `! comment` and surrounding whitespace.
fn tag_value(raw: &str) -> &str {
    match raw.find(" !") {
        Some(pos) => raw[..pos].trim(),
        None => raw.trim(),
    }
}

///
/// Parse an OBO document into a [TermGraph].
///
pub fn parse_obo<R: BufRead>(reader: R) -> Result<TermGraph, OntologyLoadError> {
    let mut graph = TermGraph::new();
    let mut section = Section::Header;
    let mut pending: Option<PendingTerm> = None;
    let mut line_no = 0;

    for line in reader.lines() {
        let line = line?;
        line_no += 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('!') {
            continue;
        }

        if trimmed.starts_with('[') {
            if !trimmed.ends_with(']') {
                return Err(OntologyLoadError::MalformedLine {
                    line: line_no,
                    content: line.clone(),
                });
            }
            if let Some(term) = pending.take() {
                term.finish(line_no - 1, &mut graph)?;
            }
            section = match &trimmed[1..trimmed.len() - 1] {
                "Term" => {
                    pending = Some(PendingTerm::default());
                    Section::Term
                }
                _ => Section::Other,
            };
            continue;
        }

        let Some((tag, raw_value)) = trimmed.split_once(':') else {
            return Err(OntologyLoadError::MalformedLine {
                line: line_no,
                content: line.clone(),
            });
        };

        if section != Section::Term {
            continue;
        }
        let Some(term) = pending.as_mut() else {
            continue;
        };
        let value = tag_value(raw_value);
        match tag.trim() {
            "id" => term.id = Some(value.to_string()),
            "name" => term.name = Some(value.to_string()),
            "is_a" => term.parents.push(value.to_string()),
            "is_obsolete" => term.obsolete = value == "true",
            _ => {}
        }
    }

    if let Some(term) = pending.take() {
        term.finish(line_no, &mut graph)?;
    }
    Ok(graph)
}
