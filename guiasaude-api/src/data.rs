//! Static reference datasets: symptom catalog and triage rules.
//!
//! Hand-maintained content in Portuguese, served as-is to the frontend.
//! Triage messages point users at the facility categories allowed for
//! their symptoms; the directory itself comes from the extraction
//! pipeline.

use serde::Serialize;

use guiasaude_core::model::Category;

#[derive(Debug, Clone, Serialize)]
/// One selectable symptom with its triage weight.
pub(crate) struct Symptom {
    pub id: &'static str,
    pub name: &'static str,
    pub weight: u8,
    pub group: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// A triage rule mapping symptoms to a recommendation.
pub(crate) struct TriageRule {
    pub id: &'static str,
    pub symptoms: &'static [&'static str],
    pub message: &'static str,
    pub allowed_categories: &'static [Category],
    pub priority: u8,
}

pub(crate) fn symptom_catalog() -> Vec<Symptom> {
    vec![
        // Gerais / clínicos
        Symptom { id: "febre", name: "Febre", weight: 2, group: "Geral" },
        Symptom { id: "tosse", name: "Tosse", weight: 1, group: "Respiratório" },
        Symptom { id: "dor_garganta", name: "Dor de garganta", weight: 1, group: "Respiratório" },
        Symptom { id: "dor_cabeca", name: "Dor de cabeça", weight: 1, group: "Geral" },
        Symptom { id: "vomitos", name: "Vômitos persistentes", weight: 2, group: "Gastro" },
        Symptom { id: "diarreia", name: "Diarreia", weight: 1, group: "Gastro" },
        Symptom { id: "dor_abdominal_intensa", name: "Dor abdominal intensa", weight: 3, group: "Gastro" },
        // Alerta emergencial
        Symptom { id: "falta_ar", name: "Falta de ar", weight: 5, group: "Alerta" },
        Symptom { id: "dor_peito", name: "Dor forte no peito", weight: 6, group: "Alerta" },
        Symptom { id: "desmaio_confusao", name: "Desmaio ou confusão mental", weight: 6, group: "Alerta" },
        // Saúde mental (CAPS)
        Symptom { id: "ansiedade_intensa", name: "Ansiedade intensa ou crises de pânico", weight: 2, group: "Saúde Mental" },
        Symptom { id: "depressao", name: "Tristeza profunda ou depressão", weight: 2, group: "Saúde Mental" },
        Symptom { id: "insonia_grave", name: "Insônia grave", weight: 1, group: "Saúde Mental" },
        Symptom { id: "ideacao_suicida", name: "Pensamentos de autoagressão ou suicídio", weight: 6, group: "Saúde Mental" },
        Symptom { id: "surto_psicotico", name: "Surto psicótico ou perda de contato com a realidade", weight: 6, group: "Saúde Mental" },
    ]
}

pub(crate) fn triage_rules() -> Vec<TriageRule> {
    vec![
        TriageRule {
            id: "emergencia",
            symptoms: &["falta_ar", "dor_peito", "desmaio_confusao"],
            message: "Procure imediatamente uma UPA ou hospital.",
            allowed_categories: &[Category::Upa, Category::Hospital],
            priority: 10,
        },
        TriageRule {
            id: "caps",
            symptoms: &[
                "ansiedade_intensa",
                "depressao",
                "insonia_grave",
                "ideacao_suicida",
                "surto_psicotico",
            ],
            message: "Procure um CAPS para atendimento especializado em saúde mental.",
            allowed_categories: &[Category::Caps],
            priority: 8,
        },
        TriageRule {
            id: "geral",
            symptoms: &[
                "febre",
                "tosse",
                "dor_garganta",
                "dor_cabeca",
                "vomitos",
                "diarreia",
                "dor_abdominal_intensa",
            ],
            message: "Procure uma Unidade Básica de Saúde (UBS).",
            allowed_categories: &[Category::Ubs],
            priority: 3,
        },
    ]
}
