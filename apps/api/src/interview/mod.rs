pub mod classifiers;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod report;
pub mod sessions;

#[cfg(test)]
pub mod testing;
