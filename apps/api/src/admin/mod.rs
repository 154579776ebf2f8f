pub mod handlers;
pub mod password;
pub mod repository;
pub mod session;
