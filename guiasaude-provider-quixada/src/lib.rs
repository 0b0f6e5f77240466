//! Extraction pipeline for the Quixadá municipal health-facility listing.
//!
//! The listing page is the single upstream index fetch; detail pages are
//! visited only for records whose listing block yielded neither address
//! nor hours, with a pacing delay between requests. Heuristic failures on
//! a single record leave its optional fields absent and never abort the
//! whole cycle.

mod classify;
mod detail;
mod listing;

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use guiasaude_core::{
    config::DirectoryConfig,
    model::{FacilityRecord, SourceMeta},
    ports::{FacilitySource, SourceError},
};

/// Identifying header sent with every upstream request.
pub const USER_AGENT: &str = "GuiaSaude-Academic/1.0";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)n[ãa]o\s+informado").expect("valid regex"));

/// Best-effort fields pulled from the markup before classification.
#[derive(Debug, Default)]
struct RawFacility {
    id: u32,
    name: String,
    address: Option<String>,
    hours: Option<String>,
    email: Option<String>,
    /// All text fragments seen for this record, fed to the classifier.
    body: String,
}

/// Facility extraction backend for the Quixadá listing site.
pub struct QuixadaSource {
    client: Client,
    base_url: String,
    detail_pacing: Duration,
    meta: SourceMeta,
}

impl QuixadaSource {
    /// Create a new source bound to the given HTTP client.
    ///
    /// The client is expected to carry [`USER_AGENT`] and the configured
    /// request timeout; see the serving binary for the wiring.
    #[must_use]
    pub fn new(client: Client, config: &DirectoryConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            detail_pacing: config.detail_pacing,
            meta: SourceMeta {
                id: String::from("quixada"),
                name: String::from("Quixadá"),
            },
        }
    }

    fn detail_url(&self, id: u32) -> String {
        format!("{}?id={id}", self.base_url)
    }

    async fn fetch_html(&self, url: &str) -> Result<String, SourceError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl FacilitySource for QuixadaSource {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn fetch_all(&self) -> Result<Vec<FacilityRecord>, SourceError> {
        let listing_html = self.fetch_html(&self.base_url).await?;
        let mut raws = listing::extract(&listing_html);

        for raw in &mut raws {
            if raw.address.is_some() || raw.hours.is_some() {
                continue;
            }
            tokio::time::sleep(self.detail_pacing).await;
            match self.fetch_html(&self.detail_url(raw.id)).await {
                Ok(html) => merge_detail(raw, detail::extract(&html, raw.id)),
                Err(error) => {
                    tracing::warn!(
                        id = raw.id,
                        %error,
                        "detail page fetch failed, keeping listing fields"
                    );
                }
            }
        }

        Ok(assemble(raws, &self.base_url))
    }
}

/// Classify each raw record and shape it into the domain model.
fn assemble(raws: Vec<RawFacility>, base_url: &str) -> Vec<FacilityRecord> {
    let mut records: Vec<FacilityRecord> = raws
        .into_iter()
        .map(|raw| {
            let category = classify::category(&raw.name, raw.address.as_deref(), &raw.body);
            let neighborhood = raw.address.as_deref().and_then(classify::neighborhood);
            FacilityRecord {
                id: raw.id,
                name: raw.name,
                category,
                address: raw.address,
                neighborhood,
                hours: raw.hours,
                phone: None,
                email: raw.email,
                source_url: format!("{base_url}?id={}", raw.id),
            }
        })
        .collect();
    records.sort_unstable_by_key(|record| record.id);
    records
}

/// Fill gaps in a listing-derived record from its detail page.
fn merge_detail(raw: &mut RawFacility, detail: RawFacility) {
    if raw.address.is_none() {
        raw.address = detail.address;
    }
    if raw.hours.is_none() {
        raw.hours = detail.hours;
    }
    if raw.email.is_none() {
        raw.email = detail.email;
    }
    if !detail.body.is_empty() {
        if !raw.body.is_empty() {
            raw.body.push(' ');
        }
        raw.body.push_str(&detail.body);
    }
}

/// Collapse runs of whitespace into single spaces and trim.
fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "Não informado" and friends carry no information.
fn is_placeholder(fragment: &str) -> bool {
    PLACEHOLDER_RE.is_match(fragment)
}

#[cfg(test)]
mod tests {
    use guiasaude_core::model::Category;

    use super::*;

    const LISTING: &str = r#"<html><body>
      <table>
        <tr>
          <td><a href="unidadesaude.php?id=42">VISUALIZAR</a></td>
          <td>
            <a href="unidadesaude.php?id=42">UBS Centro</a><br>
            Rua A - Centro - Quixadá<br>
            Segunda a Sexta, 07h às 17h<br>
            E-mail: não informado
          </td>
        </tr>
        <tr>
          <td>
            <a href="unidadesaude.php?id=43">UPA 24h</a><br>
            Avenida Plácido Castelo - Planalto Universitário - Quixadá<br>
            Atendimento 24 horas<br>
            upa@quixada.ce.gov.br
          </td>
        </tr>
      </table>
    </body></html>"#;

    #[test]
    fn assemble_classifies_and_derives_neighborhoods() {
        let raws = listing::extract(LISTING);
        let records = assemble(raws, "https://quixada.ce.gov.br/unidadesaude.php");

        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, 42);
        assert_eq!(records[0].name, "UBS Centro");
        assert_eq!(records[0].category, Category::Ubs);
        assert_eq!(records[0].neighborhood.as_deref(), Some("Centro"));
        assert_eq!(
            records[0].source_url,
            "https://quixada.ce.gov.br/unidadesaude.php?id=42"
        );

        assert_eq!(records[1].id, 43);
        assert_eq!(records[1].category, Category::Upa);
        assert_eq!(
            records[1].neighborhood.as_deref(),
            Some("Planalto Universitário")
        );
        assert_eq!(records[1].email.as_deref(), Some("upa@quixada.ce.gov.br"));
    }

    #[test]
    fn merge_detail_only_fills_gaps() {
        let mut raw = RawFacility {
            id: 7,
            name: "UBS João XXIII".to_owned(),
            address: Some("Rua Epitácio Pessoa - João XXIII - Quixadá".to_owned()),
            hours: None,
            email: None,
            body: "UBS João XXIII".to_owned(),
        };
        let detail = RawFacility {
            id: 7,
            name: "Unidade 7".to_owned(),
            address: Some("outro endereço".to_owned()),
            hours: Some("Segunda a Sexta, 07h às 17h".to_owned()),
            email: None,
            body: "Informações de endereço".to_owned(),
        };

        merge_detail(&mut raw, detail);

        assert_eq!(
            raw.address.as_deref(),
            Some("Rua Epitácio Pessoa - João XXIII - Quixadá")
        );
        assert_eq!(raw.hours.as_deref(), Some("Segunda a Sexta, 07h às 17h"));
        assert!(raw.body.contains("Informações de endereço"));
    }

    #[test]
    fn squash_whitespace_flattens_markup_noise() {
        assert_eq!(squash_whitespace("  Rua \n  A \t B  "), "Rua A B");
        assert_eq!(squash_whitespace("\n\t "), "");
    }
}
