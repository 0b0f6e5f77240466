//! Extraction of best-effort records from the facility index page.
//!
//! The page is a loosely structured table of anchors pointing at per-id
//! detail pages, interleaved with free text. Anchors whose target carries
//! an `id=` parameter delimit the records: each accepted anchor's visible
//! text becomes the candidate name, and every text fragment up to the next
//! facility anchor (or the end of the document) forms the candidate's
//! block, from which address, hours, and e-mail are picked by regex.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::{RawFacility, is_placeholder, squash_whitespace};

/// Caption of the per-row view button; never a facility name.
const VIEW_BUTTON_CAPTION: &str = "visualizar";

static FACILITY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=(\d+)").expect("valid regex"));

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(rua|av|avenida|travessa|pra[çc]a|rodovia|estrada|s[ií]tio|distrito|loteamento|conjunto)\b")
        .expect("valid regex")
});

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(segunda|ter[çc]a|quarta|quinta|sexta|s[áa]bado|domingo)\b|24\s*h")
        .expect("valid regex")
});

struct RawBlock {
    id: u32,
    name: String,
    fragments: Vec<String>,
}

impl RawBlock {
    /// First-match-wins field selection over the collected fragments.
    fn finish(self) -> RawFacility {
        let address = self
            .fragments
            .iter()
            .find(|fragment| ADDRESS_RE.is_match(fragment))
            .cloned();
        let hours = self
            .fragments
            .iter()
            .find(|fragment| HOURS_RE.is_match(fragment))
            .cloned();
        let email = self
            .fragments
            .iter()
            .find(|fragment| fragment.contains('@'))
            .cloned();
        let body = self.fragments.join(" ");

        RawFacility {
            id: self.id,
            name: self.name,
            address,
            hours,
            email,
            body,
        }
    }
}

/// Scan the index page for facility anchors and their text blocks.
pub(crate) fn extract(html: &str) -> Vec<RawFacility> {
    let document = Html::parse_document(html);

    let mut facilities = Vec::new();
    let mut seen = HashSet::new();
    let mut open: Option<RawBlock> = None;
    // Text inside the most recent facility anchor is its name, not block text.
    let mut current_anchor = None;

    for node in document.tree.root().descendants() {
        if let Some(element) = ElementRef::wrap(node) {
            if element.value().name() != "a" {
                continue;
            }
            let Some(id) = facility_id(element.value().attr("href")) else {
                continue;
            };

            // Any facility anchor closes the running block.
            if let Some(block) = open.take() {
                facilities.push(block.finish());
            }
            current_anchor = Some(node.id());

            let name = squash_whitespace(&element.text().collect::<String>());
            if name.is_empty() || name.eq_ignore_ascii_case(VIEW_BUTTON_CAPTION) {
                continue;
            }
            // First accepted anchor wins for a given id.
            if !seen.insert(id) {
                continue;
            }

            open = Some(RawBlock {
                id,
                name,
                fragments: Vec::new(),
            });
        } else if let Some(text) = node.value().as_text() {
            if current_anchor
                .is_some_and(|anchor| node.ancestors().any(|ancestor| ancestor.id() == anchor))
            {
                continue;
            }
            let Some(block) = open.as_mut() else {
                continue;
            };
            let fragment = squash_whitespace(text);
            if !fragment.is_empty() && !is_placeholder(&fragment) {
                block.fragments.push(fragment);
            }
        }
    }

    // No further anchor: the last block extends to the end of the document.
    if let Some(block) = open.take() {
        facilities.push(block.finish());
    }

    facilities
}

fn facility_id(href: Option<&str>) -> Option<u32> {
    FACILITY_ID_RE
        .captures(href?)
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_button_anchor_is_discarded_in_favor_of_the_named_one() {
        let html = r#"<html><body>
          <a href="unidadesaude.php?id=42">VISUALIZAR</a>
          <a href="unidadesaude.php?id=42">UBS Centro</a><br>
          Rua A - Centro - Quixadá
        </body></html>"#;

        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 42);
        assert_eq!(records[0].name, "UBS Centro");
        assert_eq!(records[0].address.as_deref(), Some("Rua A - Centro - Quixadá"));
    }

    #[test]
    fn first_accepted_anchor_wins_for_a_given_id() {
        let html = r#"<html><body>
          <a href="?id=7">UBS João XXIII</a><br>
          Rua Epitácio Pessoa - João XXIII - Quixadá<br>
          <a href="?id=7">UBS João 23 (duplicada)</a><br>
          Rua Errada - Outro - Quixadá
        </body></html>"#;

        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "UBS João XXIII");
        assert_eq!(
            records[0].address.as_deref(),
            Some("Rua Epitácio Pessoa - João XXIII - Quixadá")
        );
    }

    #[test]
    fn blocks_are_delimited_by_the_next_facility_anchor() {
        let html = r#"<html><body>
          <a href="?id=1">UBS Centro</a><br>
          Rua A - Centro - Quixadá<br>
          Segunda a Sexta, 07h às 17h
          <a href="?id=2">UPA 24h</a><br>
          Avenida B - Putiú - Quixadá<br>
          Atendimento 24 horas<br>
          upa@quixada.ce.gov.br
        </body></html>"#;

        let records = extract(html);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].hours.as_deref(), Some("Segunda a Sexta, 07h às 17h"));
        assert_eq!(records[0].email, None);

        assert_eq!(records[1].address.as_deref(), Some("Avenida B - Putiú - Quixadá"));
        assert_eq!(records[1].hours.as_deref(), Some("Atendimento 24 horas"));
        assert_eq!(records[1].email.as_deref(), Some("upa@quixada.ce.gov.br"));
    }

    #[test]
    fn placeholder_fragments_are_dropped() {
        let html = r#"<html><body>
          <a href="?id=5">UBS Campo Novo</a><br>
          não informado<br>
          Rua Francisco Nobre - Campo Novo - Quixadá
        </body></html>"#;

        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].address.as_deref(),
            Some("Rua Francisco Nobre - Campo Novo - Quixadá")
        );
        assert!(!records[0].body.contains("informado"));
    }

    #[test]
    fn anchors_without_an_id_parameter_are_ignored() {
        let html = r#"<html><body>
          <a href="/sobre.php">Sobre o portal</a>
          <a href="?id=abc">Link quebrado</a>
          <a href="?id=9">UBS Irajá</a>
        </body></html>"#;

        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 9);
    }

    #[test]
    fn empty_listing_yields_no_records() {
        assert!(extract("<html><body><p>Sem unidades</p></body></html>").is_empty());
    }
}
