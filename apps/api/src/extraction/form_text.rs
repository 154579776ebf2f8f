/// Heading printed at the top of the recruitment questionnaire page.
pub const FORM_MARKER: &str = "QUESTIONNAIRE DE RECRUTEMENT";
/// Characters kept after the marker when the page layout is unknown.
const FALLBACK_WINDOW: usize = 6000;

/// Locates the questionnaire in the text of a CV bundle.
///
/// The questionnaire is normally page 3. When it is not there the text is
/// sliced from the first marker onwards; `None` means the PDF has no form.
pub fn locate_form(pdf_text: &str) -> Option<&str> {
    if let Some(page) = pdf_text.split('\x0c').nth(2) {
        if page.contains(FORM_MARKER) {
            return Some(page);
        }
    }

    let start = pdf_text.find(FORM_MARKER)?;
    let rest = &pdf_text[start..];
    let end = rest
        .char_indices()
        .nth(FALLBACK_WINDOW)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// First `max_chars` characters, for previews.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}
