//! Category inference and neighborhood derivation over free text.
//!
//! Keyword matching runs on a normalized haystack: uppercased, with
//! punctuation collapsed to single spaces and sentinel spaces at both
//! ends, so every keyword check is a whole-word (or whole-phrase) match
//! and "UPA" never fires inside "OCUPAÇÃO".

use guiasaude_core::model::Category;

// Priority order, first match wins: mental health always outranks
// everything since it is the most specific routing signal; explicit
// urgent-care naming outranks hospital; generic urgency phrasing ranks
// below hospital, so "Hospital Municipal, atendimento de URGÊNCIA"
// stays a hospital.
const CAPS_KEYWORDS: &[&str] = &["CAPS", "PSICOSSOCIAL", "SAÚDE MENTAL", "SAUDE MENTAL"];
const UPA_KEYWORDS: &[&str] = &["UPA", "PRONTO ATENDIMENTO", "PRONTO SOCORRO"];
const HOSPITAL_KEYWORDS: &[&str] = &["HOSPITAL", "MATERNIDADE", "POLICLÍNICA", "POLICLINICA"];
const URGENCY_KEYWORDS: &[&str] = &[
    "URGÊNCIA",
    "URGENCIA",
    "EMERGÊNCIA",
    "EMERGENCIA",
    "24 HORAS",
    "24H",
];
const UBS_KEYWORDS: &[&str] = &[
    "UBS",
    "UNIDADE BÁSICA",
    "UNIDADE BASICA",
    "POSTO DE SAÚDE",
    "POSTO DE SAUDE",
    "PSF",
    "ESF",
];

/// Segments that name something broader than a neighborhood.
const GENERIC_SEGMENTS: &[&str] = &[
    "ZONA URBANA",
    "ZONA RURAL",
    "QUIXADÁ",
    "QUIXADA",
    "CEARÁ",
    "CEARA",
    "CE",
    "BRASIL",
];

/// Portuguese connectives kept lowercase when title-casing.
const CONNECTIVES: &[&str] = &["de", "da", "do", "das", "dos", "e"];

/// Infer the facility category from name, address, and page body.
pub(crate) fn category(name: &str, address: Option<&str>, body: &str) -> Category {
    let mut combined = String::from(name);
    if let Some(address) = address {
        combined.push(' ');
        combined.push_str(address);
    }
    combined.push(' ');
    combined.push_str(body);
    let haystack = normalize(&combined);

    if matches_any(&haystack, CAPS_KEYWORDS) {
        Category::Caps
    } else if matches_any(&haystack, UPA_KEYWORDS) {
        Category::Upa
    } else if matches_any(&haystack, HOSPITAL_KEYWORDS) {
        Category::Hospital
    } else if matches_any(&haystack, URGENCY_KEYWORDS) {
        Category::Upa
    } else if matches_any(&haystack, UBS_KEYWORDS) {
        Category::Ubs
    } else {
        Category::default()
    }
}

/// Derive a neighborhood from a delimited address string.
///
/// The first segment is assumed to be the street line; the second is the
/// candidate. A generic second segment (urban/rural zone, city, state,
/// country) falls back to the third when one exists. Candidates shorter
/// than 3 characters are rejected.
pub(crate) fn neighborhood(address: &str) -> Option<String> {
    let segments: Vec<&str> = address
        .split('-')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.len() < 2 {
        return None;
    }

    let mut candidate = *segments.get(1)?;
    if is_generic(candidate) {
        candidate = *segments.get(2)?;
    }

    let candidate = title_case(candidate);
    if candidate.chars().count() < 3 {
        return None;
    }
    Some(candidate)
}

/// Uppercase, replace punctuation with spaces, and add sentinel spaces.
fn normalize(text: &str) -> String {
    let upper = text.to_uppercase();
    let cleaned: String = upper
        .chars()
        .map(|character| {
            if character.is_alphanumeric() {
                character
            } else {
                ' '
            }
        })
        .collect();

    let mut haystack = String::with_capacity(cleaned.len() + 2);
    haystack.push(' ');
    for word in cleaned.split_whitespace() {
        haystack.push_str(word);
        haystack.push(' ');
    }
    haystack
}

fn matches_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|keyword| haystack.contains(&format!(" {keyword} ")))
}

fn is_generic(segment: &str) -> bool {
    let normalized = normalize(segment);
    GENERIC_SEGMENTS
        .iter()
        .any(|generic| normalized.trim() == *generic)
}

fn title_case(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .enumerate()
        .map(|(index, word)| {
            if index > 0 && CONNECTIVES.contains(&word) {
                word.to_owned()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut characters = word.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}
