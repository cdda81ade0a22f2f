// Multi-agent candidate evaluation.
// Evaluators run concurrently, their scores are normalized and voted on, and the
// result is projected into a report with a decision trace.
// All LLM calls go through llm_client.

pub mod agents;
pub mod conflicts;
pub mod handlers;
pub mod matching;
pub mod models;
pub mod panel;
pub mod report;
pub mod scoring;
pub mod trace;
