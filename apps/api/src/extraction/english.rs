//! Reads the English-level grid (`Faible / Moyen / Bien` by `Lu / Ecrit / Parlé`)
//! straight from the text layout. Models misread ticked grids, so this
//! result overrides whatever the LLM returns for the field.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

const LEVELS: [&str; 3] = ["Faible", "Moyen", "Bien"];

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)faible\s+moyen\s+bien").expect("static pattern"))
}

fn row_patterns() -> &'static [(&'static str, Regex); 3] {
    static PATTERNS: OnceLock<[(&'static str, Regex); 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            ("Lu", Regex::new(r"(?i)^Lu\b").expect("static pattern")),
            ("Ecrit", Regex::new(r"(?i)^Ecrit\b").expect("static pattern")),
            ("Parlé", Regex::new(r"(?i)^Parl[eé]\b").expect("static pattern")),
        ]
    })
}

/// Character offset of `needle` in an ASCII-lowercased copy of `line`.
fn column_of(line: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    line.windows(needle.len())
        .position(|w| w.iter().map(char::to_ascii_lowercase).eq(needle.iter().copied()))
}

/// `{Lu, Ecrit, Parlé}` with `Faible`/`Moyen`/`Bien`, or `-` when a row is
/// missing, blank or has more than one mark.
pub fn read_english_levels(form_text: &str) -> Map<String, Value> {
    let cleaned = form_text.replace('\r', "");
    let lines: Vec<&str> = cleaned.split('\n').map(str::trim_end).collect();

    let mut levels = Map::new();
    let Some(header) = lines.iter().find(|l| header_pattern().is_match(l)) else {
        for (skill, _) in row_patterns() {
            levels.insert(skill.to_string(), Value::String("-".to_string()));
        }
        return levels;
    };

    let header: Vec<char> = header.chars().collect();
    let columns: Vec<Option<usize>> = LEVELS
        .iter()
        .map(|level| column_of(&header, &level.to_ascii_lowercase()))
        .collect();

    for (skill, pattern) in row_patterns() {
        let level = lines
            .iter()
            .find(|l| pattern.is_match(l))
            .map(|row| resolve_row(row, &columns))
            .unwrap_or("-");
        levels.insert(skill.to_string(), Value::String(level.to_string()));
    }
    levels
}

fn resolve_row(row: &str, columns: &[Option<usize>]) -> &'static str {
    let row: Vec<char> = row.chars().collect();
    let picks: Vec<&'static str> = LEVELS
        .iter()
        .zip(columns)
        .filter(|(_, col)| col.and_then(|c| row.get(c)) == Some(&'X'))
        .map(|(level, _)| *level)
        .collect();
    match picks.as_slice() {
        [single] => single,
        _ => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "\
Votre niveau de l'anglais technique
          Faible   Moyen   Bien
Lu                 X
Ecrit     X
Parlé                      X
";

    #[test]
    fn test_reads_marked_columns() {
        let levels = read_english_levels(GRID);
        assert_eq!(levels["Lu"], "Moyen");
        assert_eq!(levels["Ecrit"], "Faible");
        assert_eq!(levels["Parlé"], "Bien");
    }

    #[test]
    fn test_double_mark_is_ambiguous() {
        let grid = "          Faible   Moyen   Bien\r\nLu        X        X\r\n";
        let levels = read_english_levels(grid);
        assert_eq!(levels["Lu"], "-");
        assert_eq!(levels["Ecrit"], "-");
    }

    #[test]
    fn test_unaccented_parle_row() {
        let grid = "          faible   moyen   bien\nParle     X\n";
        assert_eq!(read_english_levels(grid)["Parlé"], "Faible");
    }

    #[test]
    fn test_no_header_means_unknown() {
        let levels = read_english_levels("Lu X\nEcrit X");
        assert_eq!(levels.len(), 3);
        assert!(levels.values().all(|v| v == "-"));
    }

    #[test]
    fn test_lowercase_mark_is_not_counted() {
        let grid = "          Faible   Moyen   Bien\nLu        x\n";
        assert_eq!(read_english_levels(grid)["Lu"], "-");
    }
}
