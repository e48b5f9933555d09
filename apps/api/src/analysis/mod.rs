pub mod analyzer;
pub mod comparison;
pub mod handlers;
pub mod incorporation;
pub mod prompts;
pub mod reconcile;
