//! Extraction of one record from a facility's own detail page.
//!
//! Detail pages label their sections with free-text headings such as
//! "Informações de endereço". Field resolution walks forward from the
//! first text node matching a section-label pattern and takes the first
//! meaningful fragment, stopping early when it runs into an unrelated
//! section title so one section never bleeds into the next.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::{RawFacility, is_placeholder, squash_whitespace};

static ADDRESS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)informa[çc][õo]es\s+de\s+endere[çc]o").expect("valid regex"));

static HOURS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hor[áa]rio\s+de\s+funcionamento").expect("valid regex"));

/// Titles of sections whose content must not be mistaken for field text.
static SECTION_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(corpo\s+cl[ií]nico|profissionais|equipe|servi[çc]os|especialidades|unidades|contato)")
        .expect("valid regex")
});

static HEADING_SELECTORS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        Selector::parse("h1").expect("valid selector"),
        Selector::parse("h2").expect("valid selector"),
        Selector::parse("h3").expect("valid selector"),
    ]
});

/// Derive a best-effort record from a detail page.
///
/// Missing sections become absent fields; the synthesized placeholder
/// name is used only when no heading carries text at all.
pub(crate) fn extract(html: &str, id: u32) -> RawFacility {
    let document = Html::parse_document(html);

    let name = heading(&document).unwrap_or_else(|| format!("Unidade {id}"));
    let address = find_after_label(&document, &ADDRESS_LABEL_RE);
    let hours = find_after_label(&document, &HOURS_LABEL_RE);
    let body = page_text(&document);
    let email = body
        .split(' ')
        .find(|word| word.contains('@'))
        .map(str::to_owned);

    RawFacility {
        id,
        name,
        address,
        hours,
        email,
        body,
    }
}

/// First non-empty heading, trying all `h1`s before `h2`s before `h3`s.
fn heading(document: &Html) -> Option<String> {
    for selector in HEADING_SELECTORS.iter() {
        for element in document.select(selector) {
            let text = squash_whitespace(&element.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Walk forward from the first text node matching `label` and return the
/// first meaningful fragment, skipping repeats of the label itself and
/// giving up on the first unrelated section title.
fn find_after_label(document: &Html, label: &Regex) -> Option<String> {
    let mut past_label = false;
    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let fragment = squash_whitespace(text);
        if fragment.is_empty() {
            continue;
        }
        if !past_label {
            past_label = label.is_match(&fragment);
            continue;
        }
        if label.is_match(&fragment) {
            continue;
        }
        if SECTION_BREAK_RE.is_match(&fragment) {
            return None;
        }
        if fragment.chars().count() > 3 && !is_placeholder(&fragment) {
            return Some(fragment);
        }
    }
    None
}

/// All visible text of the page, normalized, for the classifier.
fn page_text(document: &Html) -> String {
    let mut parts = Vec::new();
    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_script = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| matches!(element.name(), "script" | "style"))
        });
        if in_script {
            continue;
        }
        let fragment = squash_whitespace(text);
        if !fragment.is_empty() && !is_placeholder(&fragment) {
            parts.push(fragment);
        }
    }
    parts.join(" ")
}
