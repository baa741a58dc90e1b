//! Term emphasis for rendered text.
//!
//! Matching is a case-sensitive literal substring search: a selected term is
//! emphasised wherever it occurs, including inside longer words ("CM" inside
//! "CMMC"). Lookup misses never fail a render; they fall back to
//! [`DEFINITION_NOT_FOUND`].

use regex::Regex;

use crate::glossary::{DEFINITION_NOT_FOUND, Glossary};
use crate::render::escape_xml;

/// A run of text; `definition` is set on emphasised occurrences of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub definition: Option<String>,
}

impl TextSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            definition: None,
        }
    }

    fn emphasized(text: &str, definition: &str) -> Self {
        Self {
            text: text.to_string(),
            definition: Some(definition.to_string()),
        }
    }

    pub fn is_emphasized(&self) -> bool {
        self.definition.is_some()
    }

    fn push_markup(&self, out: &mut String) {
        match &self.definition {
            Some(definition) => {
                out.push_str("<b title=\"");
                out.push_str(&escape_xml(definition));
                out.push_str("\">");
                out.push_str(&self.text);
                out.push_str("</b>");
            }
            None => out.push_str(&self.text),
        }
    }
}

/// The current highlight selection together with the glossary it resolves against.
#[derive(Debug, Clone, Copy)]
pub struct TermHighlighter<'a> {
    term: Option<&'a str>,
    glossary: &'a Glossary,
}

impl<'a> TermHighlighter<'a> {
    pub fn new(term: Option<&'a str>, glossary: &'a Glossary) -> Self {
        Self { term, glossary }
    }

    pub fn term(&self) -> Option<&'a str> {
        self.term
    }

    pub fn spans(&self, text: &str) -> Vec<TextSpan> {
        highlight_spans(text, self.term, self.glossary)
    }
}

pub fn highlight(text: &str, term: Option<&str>, glossary: &Glossary) -> String {
    if selected(term).is_none() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for span in highlight_spans(text, term, glossary) {
        span.push_markup(&mut out);
    }
    out
}

pub fn highlight_spans(text: &str, term: Option<&str>, glossary: &Glossary) -> Vec<TextSpan> {
    let Some(term) = selected(term) else {
        return vec![TextSpan::plain(text)];
    };
    if !text.contains(term) {
        return vec![TextSpan::plain(text)];
    }
    let definition = match glossary.lookup(term) {
        Some(definition) => definition,
        None => {
            tracing::debug!(term, "highlighted term missing from glossary");
            DEFINITION_NOT_FOUND
        }
    };

    let mut spans = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(term) {
        if pos > 0 {
            spans.push(TextSpan::plain(&rest[..pos]));
        }
        spans.push(TextSpan::emphasized(term, definition));
        rest = &rest[pos + term.len()..];
    }
    if !rest.is_empty() {
        spans.push(TextSpan::plain(rest));
    }
    spans
}

/// Wraps every glossary term found in `text` in an `<abbr>` tooltip.
///
/// Terms are matched in a single left-to-right pass, preferring the longest
/// term at each position, so markup inserted for one term is never rescanned
/// for another.
pub fn annotate_terms(text: &str, glossary: &Glossary) -> String {
    if glossary.is_empty() {
        return text.to_string();
    }
    let mut terms: Vec<&str> = glossary.terms().filter(|t| !t.is_empty()).collect();
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!(%err, "glossary too large to annotate");
            return text.to_string();
        }
    };
    re.replace_all(text, |caps: &regex::Captures<'_>| {
        let term = &caps[0];
        format!(
            "<abbr title=\"{}\">{}</abbr>",
            escape_xml(glossary.definition_or_fallback(term)),
            term
        )
    })
    .into_owned()
}

fn selected(term: Option<&str>) -> Option<&str> {
    term.filter(|term| !term.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glossary() -> Glossary {
        [
            ("CM", "Configuration Management"),
            ("CMMC", "Cybersecurity Maturity Model Certification"),
            ("IaC", "Infrastructure as Code"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn unset_term_is_a_no_op() {
        let g = glossary();
        for text in ["", "CMMC-level", "a <b>bold</b> & line"] {
            assert_eq!(highlight(text, None, &g), text);
            assert_eq!(highlight(text, Some(""), &g), text);
        }
    }

    #[test]
    fn matches_inside_longer_words() {
        let out = highlight("CMMC-level", Some("CM"), &glossary());
        assert_eq!(out, "<b title=\"Configuration Management\">CM</b>MC-level");
    }

    #[test]
    fn every_occurrence_is_emphasised() {
        let spans = highlight_spans("IaC templates, IaC drift", Some("IaC"), &glossary());
        let emphasized = spans.iter().filter(|s| s.is_emphasized()).count();
        assert_eq!(emphasized, 2);
        let joined: String = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "IaC templates, IaC drift");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(highlight("iac pipelines", Some("IaC"), &glossary()), "iac pipelines");
    }

    #[test]
    fn missing_definition_falls_back() {
        let out = highlight("SIEM alerts", Some("SIEM"), &glossary());
        assert_eq!(out, "<b title=\"Definition not found\">SIEM</b> alerts");
    }

    #[test]
    fn definitions_are_escaped_in_markup() {
        let g: Glossary = [("R&D", "Research & \"Development\"")].into_iter().collect();
        let out = highlight("R&D budget", Some("R&D"), &g);
        assert_eq!(
            out,
            "<b title=\"Research &amp; &quot;Development&quot;\">R&D</b> budget"
        );
    }

    #[test]
    fn annotate_prefers_longest_term() {
        let out = annotate_terms("CMMC and CM", &glossary());
        assert_eq!(
            out,
            "<abbr title=\"Cybersecurity Maturity Model Certification\">CMMC</abbr> and \
             <abbr title=\"Configuration Management\">CM</abbr>"
        );
    }

    #[test]
    fn highlighter_carries_selection() {
        let g = glossary();
        let highlighter = TermHighlighter::new(Some("CM"), &g);
        assert_eq!(highlighter.term(), Some("CM"));
        assert_eq!(highlighter.spans("no match").len(), 1);
    }
}
