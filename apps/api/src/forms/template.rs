//! Shape of the recruitment form a candidate fills through a tokenized link.

use serde_json::{json, Map, Value};

/// Key of the nested English-level object (`Lu`, `Ecrit`, `Parlé`).
pub const ENGLISH_LEVEL_KEY: &str = "Votre niveau de l'anglais technique";
pub const ENGLISH_SKILLS: [&str; 3] = ["Lu", "Ecrit", "Parlé"];

/// Identity and background fields, in form order.
pub const IDENTITY_FIELDS: [&str; 9] = [
    "Nom",
    "Prénom",
    "Date de naissance",
    "Adress Actuel",
    "Post Actuel",
    "Société",
    "Date d'embauche",
    "Salaire net Actuel",
    "Votre dernier diplome",
];

/// Free-text questionnaire fields that follow the English table.
pub const QUESTIONNAIRE_FIELDS: [&str; 14] = [
    "situationFamiliale",
    "nbEnfants",
    "pourquoiChanger",
    "dureePreavis",
    "fonctionsMissions",
    "ecole",
    "anneeDiplome",
    "posteSedentaire",
    "missionsMaitrisees",
    "travailSeulEquipe",
    "zoneSapino",
    "motorise",
    "pretentionsSalariales",
    "questionsRemarques",
];

/// Every extractable text field: identity first, then the questionnaire.
pub fn text_fields() -> impl Iterator<Item = &'static str> {
    IDENTITY_FIELDS.into_iter().chain(QUESTIONNAIRE_FIELDS)
}

/// English levels with every skill set to `value`.
pub fn english_levels(value: &str) -> Value {
    let levels: Map<String, Value> = ENGLISH_SKILLS
        .iter()
        .map(|skill| (skill.to_string(), Value::String(value.to_string())))
        .collect();
    Value::Object(levels)
}

/// Empty profile for a new form link, tagged with the requesting service.
pub fn blank_profile(service: &str, questionnaire: &str) -> Map<String, Value> {
    let mut profile = Map::new();
    profile.insert("service".to_string(), json!(service));
    profile.insert("questionnaire".to_string(), json!(questionnaire));
    for field in text_fields() {
        profile.insert(field.to_string(), json!(""));
    }
    profile.insert(ENGLISH_LEVEL_KEY.to_string(), english_levels(""));
    profile
}
