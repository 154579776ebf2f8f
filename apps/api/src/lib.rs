pub mod admin;
pub mod bundle;
pub mod candidates;
pub mod config;
pub mod db;
pub mod errors;
pub mod evaluation;
pub mod extraction;
pub mod forms;
pub mod hiring;
pub mod ledger;
pub mod llm_client;
pub mod models;
pub mod pdf;
pub mod routes;
pub mod state;
pub mod storage;
pub mod uploads;
