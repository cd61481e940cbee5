use fxhash::FxHashMap as HashMap;

use crate::errors::OntologyLoadError;

///
/// Term struct, one ontology term and its direct is-a parents.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Term {
    pub id: String,
    pub name: Option<String>,
    pub parents: Vec<String>,
}

///
/// TermGraph struct, the term graph as delivered by an ontology source.
///
/// Parents may refer to terms added later; references are only checked when
/// a type checker is built from the graph.
///
#[derive(Debug, Default, Clone)]
pub struct TermGraph {
    terms: Vec<Term>,
    by_id: HashMap<String, usize>,
}

impl TermGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(
        &mut self,
        id: &str,
        name: Option<&str>,
        parents: &[&str],
    ) -> Result<(), OntologyLoadError> {
        self.insert(Term {
            id: id.to_string(),
            name: name.map(str::to_string),
            parents: parents.iter().map(|p| p.to_string()).collect(),
        })
    }

    pub fn insert(&mut self, term: Term) -> Result<(), OntologyLoadError> {
        if self.by_id.contains_key(&term.id) {
            return Err(OntologyLoadError::DuplicateTerm(term.id));
        }
        self.by_id.insert(term.id.clone(), self.terms.len());
        self.terms.push(term);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Term> {
        self.by_id.get(id).map(|&i| &self.terms[i])
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}
