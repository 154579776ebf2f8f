use crate::forms::template;
use crate::llm_client::prompts::STRICT_EXTRACTION_RULES;

/// Strict extraction prompt: the rules, the exact JSON shape, then the form text.
pub fn build_extraction_prompt(form_text: &str) -> String {
    let schema = template::text_fields()
        .map(|field| format!("  \"{field}\": \"string\""))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "{STRICT_EXTRACTION_RULES}\n\nJSON FORMAT (must match EXACTLY):\n{{\n{schema}\n}}\n\nFORM TEXT:\n{form_text}\n\nJSON:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_field_and_ends_with_json_cue() {
        let prompt = build_extraction_prompt("Nom : Alami");
        assert!(prompt.starts_with("You are a STRICT data extraction engine."));
        assert!(prompt.contains("  \"Prénom\": \"string\","));
        assert!(prompt.contains("  \"questionsRemarques\": \"string\"\n}"));
        assert!(prompt.contains("FORM TEXT:\nNom : Alami"));
        assert!(prompt.ends_with("JSON:"));
        assert!(!prompt.contains("anglais technique\": \"string\""));
    }
}
