pub mod answer_key;
pub mod handlers;
pub mod questions;
pub mod report;
