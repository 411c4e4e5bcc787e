use crate::agent::CalendarAgent;
use crate::api::{ApiServer, AppState};
use crate::briefing::CalendarResearchAgent;
use crate::calendar::{CalendarSource, GoogleCalendar};
use crate::config::Config;
use crate::llm::{ChatModel, OpenAiChat};
use crate::research::LlmResearcher;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

/// Long-lived handles built once at startup.
pub struct Services {
    pub briefing: Arc<CalendarResearchAgent>,
    pub agent: Arc<CalendarAgent>,
}

impl Services {
    pub fn build(config: &Config) -> Result<Self> {
        let calendar: Arc<dyn CalendarSource> = Arc::new(
            GoogleCalendar::new(&config.calendar).context("Failed to set up Google Calendar")?,
        );
        let model: Arc<dyn ChatModel> =
            Arc::new(OpenAiChat::new(&config.llm).context("Failed to set up chat model")?);

        let researcher = Arc::new(LlmResearcher::new(model.clone())?);
        let briefing = Arc::new(CalendarResearchAgent::new(calendar.clone(), researcher));
        let agent = Arc::new(CalendarAgent::new(model, calendar, &config.agent)?);

        Ok(Self { briefing, agent })
    }
}

/// Start the HTTP service. Missing credentials leave the server up with
/// every route but `/health` reporting the agent as unavailable.
pub async fn run_service(config: Config) -> Result<()> {
    info!("Starting meetprep service");

    let state = match Services::build(&config) {
        Ok(services) => {
            info!("Calendar research agent initialized");
            AppState::new(Some(services.briefing), Some(services.agent))
        }
        Err(e) => {
            error!("Error initializing calendar agent: {:#}", e);
            AppState::default()
        }
    };

    ApiServer::new(&config.server, state).start().await
}

/// Answer one question with the agent and return the text.
pub async fn ask_once(config: &Config, query: &str) -> Result<String> {
    let services = Services::build(config)?;
    Ok(services.agent.run(query).await)
}
