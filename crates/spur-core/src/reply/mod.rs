pub mod generator;
pub mod prompt;

pub use generator::{GeneratorSettings, ReplyGenerator, classify_llm_error};
