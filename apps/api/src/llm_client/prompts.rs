// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Rules prepended to every extraction prompt.
pub const STRICT_EXTRACTION_RULES: &str = "You are a STRICT data extraction engine.

ABSOLUTE RULES:
- Extract ONLY information explicitly written in the form.
- DO NOT infer, guess, normalize, or harmonize values.
- DO NOT make values consistent across fields.
- If a field is empty, unclear, or ambiguous, return \"-\".
- Output VALID JSON ONLY.
- NO explanations. NO comments. NO extra text.";
