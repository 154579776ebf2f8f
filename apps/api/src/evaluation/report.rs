//! Corrected-evaluation PDFs.

use serde_json::{Map, Value};

use crate::evaluation::answer_key::{self, Grade};
use crate::evaluation::questions::MANUAL_QUESTIONS;
use crate::pdf::{DocumentBuilder, Face, PdfError, Rgb};

/// Printable form of a submitted answer; blanks and structures become `None`.
fn answer_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn verdict(correct: bool) -> (&'static str, Rgb) {
    if correct {
        ("VRAI", Rgb::GREEN)
    } else {
        ("FAUX", Rgb::RED)
    }
}

/// Multiple-choice evaluation corrected against the answer key.
pub fn render_graded(
    candidate_name: &str,
    answers: &Map<String, Value>,
    grade: &Grade,
) -> Result<Vec<u8>, PdfError> {
    let mut doc = DocumentBuilder::new();
    doc.title("Évaluation Corrigée - Form3", 20.0)
        .move_down(1.0)
        .text(format!("Candidat : {candidate_name}"), 12.0, Face::Regular, Rgb::BLACK)
        .text(
            format!("Note Finale : {}/{}", grade.score, grade.total),
            12.0,
            Face::Regular,
            Rgb::BLACK,
        )
        .move_down(1.0);

    for (index, id) in answer_key::question_ids().enumerate() {
        let raw = answer_text(answers.get(&id));
        let normalized = answer_key::normalize_answer(answers.get(&id));
        let correct = grade.correction.get(&id) == Some(&Value::Bool(true));
        let (label, color) = verdict(correct);

        doc.text(id.to_uppercase(), 10.0, Face::Regular, Rgb::SLATE)
            .text(
                format!(
                    "Réponse : {} ({})",
                    normalized.map(String::from).as_deref().unwrap_or("N/A"),
                    raw.as_deref().unwrap_or("N/A")
                ),
                10.0,
                Face::Regular,
                Rgb::GREY,
            )
            .text(
                format!(
                    "Correction : {label} | Attendu : {}",
                    answer_key::expected(index)
                ),
                10.0,
                Face::Regular,
                color,
            )
            .move_down(0.4);
    }

    doc.render()
}

/// Open questions corrected by a reviewer.
pub fn render_manual(
    candidate_name: &str,
    answers: Option<&Map<String, Value>>,
    correction: &Map<String, Value>,
    score: i32,
) -> Result<Vec<u8>, PdfError> {
    let mut doc = DocumentBuilder::new();
    doc.title("Évaluation Corrigée - Chargé d'Étude", 20.0)
        .move_down(1.0)
        .text(format!("Candidat : {candidate_name}"), 14.0, Face::Regular, Rgb::BLACK)
        .text(
            format!("Note Finale : {score}/{}", MANUAL_QUESTIONS.len()),
            14.0,
            Face::Regular,
            Rgb::BLACK,
        )
        .move_down(1.0);

    for (index, question) in MANUAL_QUESTIONS.iter().enumerate() {
        let id = format!("q{}", index + 1);
        let answer = answer_text(answers.and_then(|a| a.get(&id)));
        let (label, color) = verdict(correction.get(&id) == Some(&Value::Bool(true)));

        doc.text(*question, 10.0, Face::Bold, Rgb::SLATE)
            .text(
                format!("Réponse : {}", answer.as_deref().unwrap_or("N/A")),
                10.0,
                Face::Regular,
                Rgb::GREY,
            )
            .text(format!("Correction : {label}"), 10.0, Face::Regular, color)
            .move_down(0.5);
    }

    doc.render()
}
