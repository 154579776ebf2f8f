use serde_json::{Map, Value};

use crate::pdf::{DocumentBuilder, Face, PdfError, Rgb};

/// (answer key, printed label) for the recruitment questionnaire.
pub const QUESTIONS: [(&str, &str); 8] = [
    ("presentezVous", "1. Présentez-vous ?"),
    ("apporteEtudes", "2. Que vous ont apporté vos études ?"),
    (
        "tempsRechercheEmploi",
        "3. Depuis combien de temps cherchez-vous un emploi ?",
    ),
    (
        "qualitesDefauts",
        "4. Quelles sont vos qualités ? Quels sont vos défauts ?",
    ),
    (
        "seulOuEquipe",
        "5. Préférez-vous travailler seul ou en équipe ? Pourquoi ?",
    ),
    (
        "professionParents",
        "6. Quelle est la profession de vos parents ?",
    ),
    (
        "pretentionsSalariales",
        "7. Quelles sont vos prétentions salariales ?",
    ),
    (
        "lastExperience",
        "8. Tasks and responsibilities of last internship/job:",
    ),
];

fn answer(form: &Map<String, Value>, key: &str) -> String {
    match form.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => "-".to_string(),
    }
}

/// Renders the submitted questionnaire for `full_name` (`Nom_Prénom`).
pub fn render(
    full_name: &str,
    submitted_on: &str,
    form: &Map<String, Value>,
) -> Result<Vec<u8>, PdfError> {
    let mut doc = DocumentBuilder::new();
    doc.title("Questionnaire de Recrutement", 24.0)
        .move_down(1.5)
        .right(format!("Candidat: {full_name}"), 12.0)
        .right(format!("Date de soumission: {submitted_on}"), 12.0)
        .move_down(2.0);

    for (key, label) in QUESTIONS {
        doc.text(label, 14.0, Face::Bold, Rgb::SLATE)
            .move_down(0.5)
            .indented(answer(form, key), 12.0, 20.0, Rgb::INK)
            .move_down(1.5)
            .rule(Rgb::RULE, 0.5)
            .move_down(1.5);
    }

    doc.render()
}
