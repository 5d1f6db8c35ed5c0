//! Ordered glossary map with last-write-wins semantics.
//!
//! Terms are not unique in the source: the same quoted term can match more
//! than one definition pattern or occur in more than one paragraph. The map
//! keeps one live entry per term. A later insert replaces the earlier entry
//! in place, so iteration order is the order in which each term was first
//! seen, and the value is the one seen last.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Definition;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Definition>", into = "Vec<Definition>")]
pub struct DefinitionMap {
    entries: Vec<Definition>,
    index: HashMap<String, usize>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any live entry with the same term.
    ///
    /// Returns the replaced definition, if any.
    pub fn insert(&mut self, definition: Definition) -> Option<Definition> {
        match self.index.get(&definition.term) {
            Some(&i) => {
                debug!(term = %definition.term, "definition overwritten by later occurrence");
                Some(std::mem::replace(&mut self.entries[i], definition))
            }
            None => {
                self.index
                    .insert(definition.term.clone(), self.entries.len());
                self.entries.push(definition);
                None
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<&Definition> {
        self.index.get(term).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in first-seen term order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.entries.iter()
    }
}

impl From<Vec<Definition>> for DefinitionMap {
    fn from(definitions: Vec<Definition>) -> Self {
        let mut map = Self::new();
        for d in definitions {
            map.insert(d);
        }
        map
    }
}

impl From<DefinitionMap> for Vec<Definition> {
    fn from(map: DefinitionMap) -> Self {
        map.entries
    }
}

impl<'a> IntoIterator for &'a DefinitionMap {
    type Item = &'a Definition;
    type IntoIter = std::slice::Iter<'a, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(term: &str, text: &str, paragraph: &str) -> Definition {
        Definition {
            term: term.into(),
            definition: text.into(),
            article: "4".into(),
            paragraph: paragraph.into(),
            subparagraph: None,
        }
    }

    #[test]
    fn later_write_replaces_earlier() {
        let mut map = DefinitionMap::new();
        assert!(map.insert(def("controller", "first", "1")).is_none());
        let replaced = map.insert(def("controller", "second", "7"));
        assert_eq!(replaced.map(|d| d.definition), Some("first".to_string()));
        assert_eq!(map.len(), 1);
        let live = map.get("controller").unwrap();
        assert_eq!(live.definition, "second");
        assert_eq!(live.paragraph, "7");
    }

    #[test]
    fn iteration_keeps_first_seen_position() {
        let mut map = DefinitionMap::new();
        map.insert(def("processing", "a", "2"));
        map.insert(def("controller", "b", "7"));
        map.insert(def("processing", "c", "9"));
        let terms: Vec<&str> = map.iter().map(|d| d.term.as_str()).collect();
        assert_eq!(terms, vec!["processing", "controller"]);
        assert_eq!(map.get("processing").unwrap().definition, "c");
    }

    #[test]
    fn terms_are_case_sensitive_keys() {
        let mut map = DefinitionMap::new();
        map.insert(def("Consent", "a", "1"));
        map.insert(def("consent", "b", "2"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn serde_goes_through_plain_list() {
        let mut map = DefinitionMap::new();
        map.insert(def("recipient", "x", "9"));
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.starts_with('['));
        let back: DefinitionMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
