// Resume screening: extraction, format heuristics, prompt building,
// model response interpretation and report rendering.
// All model calls go through llm_client — no direct API calls here.

pub mod cache;
pub mod extractor;
pub mod format_check;
pub mod handlers;
pub mod interpreter;
pub mod pipeline;
pub mod prompts;
pub mod report;
