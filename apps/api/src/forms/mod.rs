pub mod handlers;
pub mod questionnaire;
pub mod template;
