pub mod agent;
pub mod api;
pub mod app;
pub mod briefing;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod global;
pub mod llm;
pub mod research;

#[cfg(test)]
mod test_support;
