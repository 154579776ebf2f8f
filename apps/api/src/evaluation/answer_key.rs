//! Expected answers for the 47-question multiple-choice evaluation.

use serde::Serialize;
use serde_json::{Map, Value};

const ANSWERS: [char; 47] = [
    'B', 'B', 'B', 'B', 'A', 'B', 'A', 'D', 'B', 'B', //
    'B', 'A', 'D', 'A', 'A', 'B', 'C', 'B', 'B', 'B', //
    'B', 'B', 'B', 'D', 'B', 'A', 'B', 'A', 'D', 'A', //
    'A', 'A', 'D', 'D', 'A', 'A', 'D', 'B', 'A', 'A', //
    'B', 'A', 'A', 'A', 'A', 'C', 'C',
];

pub const QUESTION_COUNT: usize = ANSWERS.len();

/// `q1` .. `q47`, in grading order.
pub fn question_ids() -> impl Iterator<Item = String> {
    (1..=QUESTION_COUNT).map(|n| format!("q{n}"))
}

/// Leading A-D letter of a submitted answer, uppercased.
///
/// Accepts `"b"`, `"B) Vérifier la fiche"` or `"c)"`; anything that is not a
/// non-empty string starting with A-D yields `None`.
pub fn normalize_answer(value: Option<&Value>) -> Option<char> {
    let first = value?.as_str()?.trim().chars().next()?.to_ascii_uppercase();
    ('A'..='D').contains(&first).then_some(first)
}

#[derive(Debug, Clone, Serialize)]
pub struct Grade {
    /// `qN -> correct?` for every question.
    pub correction: Map<String, Value>,
    pub score: usize,
    pub total: usize,
}

pub fn grade(answers: &Map<String, Value>) -> Grade {
    let mut correction = Map::with_capacity(QUESTION_COUNT);
    let mut score = 0;
    for (id, expected) in question_ids().zip(ANSWERS) {
        let correct = normalize_answer(answers.get(&id)) == Some(expected);
        if correct {
            score += 1;
        }
        correction.insert(id, Value::Bool(correct));
    }
    Grade {
        correction,
        score,
        total: QUESTION_COUNT,
    }
}

pub fn expected(index: usize) -> char {
    ANSWERS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn perfect_answers() -> Map<String, Value> {
        question_ids()
            .zip(ANSWERS)
            .map(|(id, a)| (id, Value::String(a.to_string())))
            .collect()
    }

    #[test]
    fn test_normalize_answer_variants() {
        assert_eq!(normalize_answer(Some(&json!("b"))), Some('B'));
        assert_eq!(normalize_answer(Some(&json!("  C) Refuser"))), Some('C'));
        assert_eq!(normalize_answer(Some(&json!("d)"))), Some('D'));
        assert_eq!(normalize_answer(Some(&json!("E"))), None);
        assert_eq!(normalize_answer(Some(&json!(""))), None);
        assert_eq!(normalize_answer(Some(&json!(2))), None);
        assert_eq!(normalize_answer(None), None);
    }

    #[test]
    fn test_perfect_score() {
        let grade = grade(&perfect_answers());
        assert_eq!(grade.score, 47);
        assert_eq!(grade.total, 47);
        assert!(grade.correction.values().all(|v| v == &Value::Bool(true)));
    }

    #[test]
    fn test_empty_answers_score_zero_but_list_every_question() {
        let grade = grade(&Map::new());
        assert_eq!(grade.score, 0);
        assert_eq!(grade.correction.len(), 47);
        assert_eq!(grade.correction["q47"], Value::Bool(false));
    }

    #[test]
    fn test_single_wrong_answer() {
        let mut answers = perfect_answers();
        answers.insert("q17".to_string(), json!("A) autre"));
        let grade = grade(&answers);
        assert_eq!(grade.score, 46);
        assert_eq!(grade.correction["q17"], Value::Bool(false));
        assert_eq!(expected(16), 'C');
    }
}
