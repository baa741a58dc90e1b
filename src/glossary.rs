use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Shown in place of a definition when a term is missing from the glossary.
pub const DEFINITION_NOT_FOUND: &str = "Definition not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryFile {
    Plain(String),
    Full(GlossaryEntry),
}

/// Case-sensitive term -> definition table owned by a single diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Glossary {
    entries: BTreeMap<String, GlossaryEntry>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: &str, definition: &str) {
        self.entries.insert(
            term.to_string(),
            GlossaryEntry {
                definition: definition.to_string(),
                domain: None,
            },
        );
    }

    pub fn insert_in_domain(&mut self, term: &str, definition: &str, domain: &str) {
        self.entries.insert(
            term.to_string(),
            GlossaryEntry {
                definition: definition.to_string(),
                domain: Some(domain.to_string()),
            },
        );
    }

    pub fn lookup(&self, term: &str) -> Option<&str> {
        self.entries.get(term).map(|entry| entry.definition.as_str())
    }

    pub fn entry(&self, term: &str) -> Option<&GlossaryEntry> {
        self.entries.get(term)
    }

    pub fn definition_or_fallback(&self, term: &str) -> &str {
        self.lookup(term).unwrap_or(DEFINITION_NOT_FOUND)
    }

    /// One-line "term: definition" summary for an info panel.
    pub fn describe(&self, term: &str) -> String {
        format!("{term}: {}", self.definition_or_fallback(term))
    }

    /// Terms in sorted order, the order a selection menu lists them in.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GlossaryEntry)> {
        self.entries.iter().map(|(term, entry)| (term.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose term or definition contains `query`, ignoring case.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<(&str, &GlossaryEntry)> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|(term, entry)| {
                needle.is_empty()
                    || term.to_lowercase().contains(&needle)
                    || entry.definition.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn in_domain(&self, domain: &str) -> Vec<(&str, &GlossaryEntry)> {
        self.iter()
            .filter(|(_, entry)| entry.domain.as_deref() == Some(domain))
            .collect()
    }

    /// Distinct domain tags, sorted.
    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self
            .entries
            .values()
            .filter_map(|entry| entry.domain.as_deref())
            .collect();
        domains.sort_unstable();
        domains.dedup();
        domains
    }
}

impl FromIterator<(String, GlossaryEntry)> for Glossary {
    fn from_iter<T: IntoIterator<Item = (String, GlossaryEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Glossary {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut glossary = Glossary::new();
        for (term, definition) in iter {
            glossary.insert(term, definition);
        }
        glossary
    }
}

impl<'de> Deserialize<'de> for Glossary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, EntryFile>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(term, entry)| {
                let entry = match entry {
                    EntryFile::Plain(definition) => GlossaryEntry {
                        definition,
                        domain: None,
                    },
                    EntryFile::Full(entry) => entry,
                };
                (term, entry)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmmc() -> Glossary {
        let mut glossary = Glossary::new();
        glossary.insert_in_domain("MFA", "Multi-Factor Authentication", "Access Control");
        glossary.insert_in_domain("RBAC", "Role-Based Access Control", "Access Control");
        glossary.insert_in_domain("TLS", "Transport Layer Security", "Encryption");
        glossary.insert("CUI", "Controlled Unclassified Information");
        glossary
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let glossary = cmmc();
        assert_eq!(glossary.lookup("TLS"), Some("Transport Layer Security"));
        assert_eq!(glossary.lookup("tls"), None);
        assert_eq!(glossary.definition_or_fallback("tls"), DEFINITION_NOT_FOUND);
    }

    #[test]
    fn search_matches_terms_and_definitions_ignoring_case() {
        let glossary = cmmc();
        let hits: Vec<&str> = glossary.search("access").iter().map(|(t, _)| *t).collect();
        assert_eq!(hits, vec!["MFA", "RBAC"]);
        let hits: Vec<&str> = glossary.search(" tls ").iter().map(|(t, _)| *t).collect();
        assert_eq!(hits, vec!["TLS"]);
        assert_eq!(glossary.search("").len(), 4);
    }

    #[test]
    fn domains_are_sorted_and_distinct() {
        let glossary = cmmc();
        assert_eq!(glossary.domains(), vec!["Access Control", "Encryption"]);
        assert_eq!(glossary.in_domain("Encryption").len(), 1);
    }

    #[test]
    fn deserializes_plain_and_tagged_entries() {
        let glossary: Glossary = serde_json::from_str(
            r#"{"CM": "Configuration Management",
                "IR": {"definition": "Incident Response", "domain": "CMMC Domain"}}"#,
        )
        .expect("glossary should parse");
        assert_eq!(glossary.lookup("CM"), Some("Configuration Management"));
        assert_eq!(
            glossary.entry("IR").and_then(|e| e.domain.as_deref()),
            Some("CMMC Domain")
        );
        assert_eq!(glossary.describe("IR"), "IR: Incident Response");
    }
}
