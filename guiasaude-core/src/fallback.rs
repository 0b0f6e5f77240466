//! Hand-curated facility records served when live extraction is unavailable.

use crate::model::{Category, FacilityRecord};

struct FallbackEntry {
    id: u32,
    name: &'static str,
    category: Category,
    address: &'static str,
    neighborhood: &'static str,
    hours: &'static str,
}

// Curated from the municipal listing; re-check after site redesigns.
const ENTRIES: &[FallbackEntry] = &[
    FallbackEntry {
        id: 1,
        name: "UBS Centro",
        category: Category::Ubs,
        address: "Rua Tabelião Enéas - Centro - Quixadá",
        neighborhood: "Centro",
        hours: "Segunda a Sexta, 07h às 17h",
    },
    FallbackEntry {
        id: 2,
        name: "UBS Planalto Universitário",
        category: Category::Ubs,
        address: "Avenida Plácido Castelo - Planalto Universitário - Quixadá",
        neighborhood: "Planalto Universitário",
        hours: "Segunda a Sexta, 07h às 17h",
    },
    FallbackEntry {
        id: 4,
        name: "UBS Combate",
        category: Category::Ubs,
        address: "Rua José de Queiroz Pessoa - Combate - Quixadá",
        neighborhood: "Combate",
        hours: "Segunda a Sexta, 07h às 17h",
    },
    FallbackEntry {
        id: 5,
        name: "UBS Campo Novo",
        category: Category::Ubs,
        address: "Rua Francisco Nobre - Campo Novo - Quixadá",
        neighborhood: "Campo Novo",
        hours: "Segunda a Sexta, 07h às 17h",
    },
    FallbackEntry {
        id: 7,
        name: "UBS João XXIII",
        category: Category::Ubs,
        address: "Rua Epitácio Pessoa - João XXIII - Quixadá",
        neighborhood: "João XXIII",
        hours: "Segunda a Sexta, 07h às 17h",
    },
    FallbackEntry {
        id: 9,
        name: "UBS Irajá",
        category: Category::Ubs,
        address: "Rua Principal - Irajá - Quixadá",
        neighborhood: "Irajá",
        hours: "Segunda a Sexta, 07h às 17h",
    },
    FallbackEntry {
        id: 11,
        name: "Posto de Saúde de Juatama",
        category: Category::Ubs,
        address: "Rua do Comércio - Juatama - Quixadá",
        neighborhood: "Juatama",
        hours: "Segunda a Sexta, 07h às 16h",
    },
    FallbackEntry {
        id: 12,
        name: "Posto de Saúde de Custódio",
        category: Category::Ubs,
        address: "Rua São Francisco - Custódio - Quixadá",
        neighborhood: "Custódio",
        hours: "Segunda a Sexta, 07h às 16h",
    },
    FallbackEntry {
        id: 14,
        name: "UPA 24h de Quixadá",
        category: Category::Upa,
        address: "Avenida Jesus Maria José - Putiú - Quixadá",
        neighborhood: "Putiú",
        hours: "Atendimento 24 horas",
    },
    FallbackEntry {
        id: 15,
        name: "Hospital e Maternidade Jesus Maria José",
        category: Category::Hospital,
        address: "Rua Padre Luís Filgueiras - Centro - Quixadá",
        neighborhood: "Centro",
        hours: "Atendimento 24 horas",
    },
    FallbackEntry {
        id: 16,
        name: "Unidade Hospitalar Dr. Eudásio Barroso",
        category: Category::Hospital,
        address: "Rua Clube dos Trabalhadores - Alto São Francisco - Quixadá",
        neighborhood: "Alto São Francisco",
        hours: "Atendimento 24 horas",
    },
    FallbackEntry {
        id: 17,
        name: "CAPS Geral II de Quixadá",
        category: Category::Caps,
        address: "Rua Juvêncio de Queiroz - Centro - Quixadá",
        neighborhood: "Centro",
        hours: "Segunda a Sexta, 07h às 17h",
    },
    FallbackEntry {
        id: 18,
        name: "CAPS AD de Quixadá",
        category: Category::Caps,
        address: "Rua Monsenhor Salviano - Combate - Quixadá",
        neighborhood: "Combate",
        hours: "Segunda a Sexta, 07h às 17h",
    },
];

/// Materialize the static dataset, deriving each `source_url` from the
/// configured base URL.
#[must_use]
pub fn fallback_records(base_url: &str) -> Vec<FacilityRecord> {
    ENTRIES
        .iter()
        .map(|entry| FacilityRecord {
            id: entry.id,
            name: entry.name.to_owned(),
            category: entry.category,
            address: Some(entry.address.to_owned()),
            neighborhood: Some(entry.neighborhood.to_owned()),
            hours: Some(entry.hours.to_owned()),
            phone: None,
            email: None,
            source_url: format!("{base_url}?id={}", entry.id),
        })
        .collect()
}
