pub mod analysis;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod scores;
pub mod validation;
