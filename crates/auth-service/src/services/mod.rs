pub mod session_service;
pub mod token_service;
