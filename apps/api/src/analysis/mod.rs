pub mod handlers;
pub mod interpreter;
pub mod model;
pub mod prompts;
pub mod service;
