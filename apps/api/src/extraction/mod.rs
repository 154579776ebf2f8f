//! CV upload and structured extraction of the recruitment questionnaire.

pub mod english;
pub mod form_text;
pub mod handlers;
pub mod jobs;
pub mod pipeline;
pub mod prompts;
