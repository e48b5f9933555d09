// Job-posting extraction: prompt, model call, JSON recovery and schema enforcement.

pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod schema;
