//! A ReAct agent that answers free-form calendar questions.
//!
//! The model is prompted with the tool list, asked to emit
//! `Action:` / `Action Input:` lines, and fed the tool output back as an
//! `Observation:` until it produces a `Final Answer:`.

mod parser;
mod tools;

pub use parser::{AgentStep, ParseError, ReActParser};
pub use tools::{calendar_tools, Tool};

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::calendar::CalendarSource;
use crate::config::AgentConfig;
use crate::llm::{ChatMessage, ChatModel};

pub const STOP_SEQUENCE: &str = "\nObservation";
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit or time limit.";

const PROMPT_TEMPLATE: &str = r#"You are a helpful calendar assistant that can access Google Calendar data and extract meeting information.

You have access to the following tools:
{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

When extracting person names and meeting titles, be thorough and accurate.
If multiple people are mentioned, list them all.
If the meeting title in the description is more descriptive than the calendar title, prefer the description version.

Question: {input}
Thought: {agent_scratchpad}"#;

pub struct CalendarAgent {
    model: Arc<dyn ChatModel>,
    tools: Vec<Box<dyn Tool>>,
    parser: ReActParser,
    max_iterations: usize,
    verbose: bool,
}

impl CalendarAgent {
    pub fn new(
        model: Arc<dyn ChatModel>,
        calendar: Arc<dyn CalendarSource>,
        config: &AgentConfig,
    ) -> Result<Self> {
        Ok(Self {
            model,
            tools: calendar_tools(calendar),
            parser: ReActParser::new()?,
            max_iterations: config.max_iterations,
            verbose: config.verbose,
        })
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    fn render_prompt(&self, query: &str, scratchpad: &str) -> String {
        let tools = self
            .tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");

        PROMPT_TEMPLATE
            .replace("{tools}", &tools)
            .replace("{tool_names}", &self.tool_names().join(", "))
            .replace("{input}", query)
            .replace("{agent_scratchpad}", scratchpad)
    }

    async fn observe(&self, tool: &str, input: &str) -> Result<String> {
        match self.tools.iter().find(|t| t.name() == tool) {
            Some(t) => t.call(input).await,
            None => {
                warn!("Agent requested unknown tool '{}'", tool);
                Ok(format!(
                    "{} is not a valid tool, try one of [{}].",
                    tool,
                    self.tool_names().join(", ")
                ))
            }
        }
    }

    /// Run the reasoning loop, surfacing model, parse and tool errors.
    pub async fn invoke(&self, query: &str) -> Result<String> {
        let stop = [STOP_SEQUENCE.to_string()];
        let mut scratchpad = String::new();

        for iteration in 1..=self.max_iterations {
            let prompt = self.render_prompt(query, &scratchpad);
            let reply = self
                .model
                .complete(&[ChatMessage::user(prompt)], &stop)
                .await?;

            if self.verbose {
                info!("Agent step {}: {}", iteration, reply);
            } else {
                debug!("Agent step {}: {}", iteration, reply);
            }

            match self.parser.parse(&reply)? {
                AgentStep::Finish { output } => return Ok(output),
                AgentStep::Action { tool, input, log } => {
                    let observation = self.observe(&tool, &input).await?;
                    if self.verbose {
                        info!("Observation from {}: {}", tool, observation);
                    }
                    scratchpad.push_str(&format!("{}\nObservation: {}\nThought: ", log, observation));
                }
            }
        }

        warn!(
            "Agent hit the iteration limit of {} for '{}'",
            self.max_iterations, query
        );
        Ok(ITERATION_LIMIT_MESSAGE.to_string())
    }

    /// Answer `query`, folding any failure into the answer text.
    pub async fn run(&self, query: &str) -> String {
        match self.invoke(query).await {
            Ok(answer) => answer,
            Err(e) => format!("Error executing agent: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::test_support::{meeting_at, FakeCalendar};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
        stops: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
                stops: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            stop: &[String],
        ) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(messages[0].content.clone());
            self.stops.lock().unwrap().push(stop.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or(LlmError::EmptyResponse)
        }
    }

    fn agent_with(model: Arc<ScriptedModel>, calendar: FakeCalendar) -> CalendarAgent {
        CalendarAgent::new(model, Arc::new(calendar), &AgentConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_tool_call_then_final_answer() {
        let model = Arc::new(ScriptedModel::new(&[
            "I need the next meeting.\nAction: get_next_meeting\nAction Input: next",
            "I now know the final answer\nFinal Answer: Your next meeting is with Jane Doe.",
        ]));
        let calendar = FakeCalendar {
            next: Some(meeting_at("n", "Interview: Jane Doe", "2025-09-24T16:00:00Z")),
            ..FakeCalendar::default()
        };
        let agent = agent_with(model.clone(), calendar);

        let answer = agent.run("Who is my next meeting with?").await;
        assert_eq!(answer, "Your next meeting is with Jane Doe.");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Question: Who is my next meeting with?"));
        assert!(prompts[0].contains(
            "should be one of [get_next_meeting, get_meetings_for_date, search_meetings, get_meeting_by_id]"
        ));
        assert!(prompts[0].ends_with("Thought: "));
        assert!(prompts[1].contains("Action Input: next\nObservation: {"));
        assert!(prompts[1].contains("\"meeting_title\": \"Interview: Jane Doe\""));
        assert!(prompts[1].ends_with("}\nThought: "));

        assert_eq!(model.stops.lock().unwrap()[0], vec!["\nObservation".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_tool_observation() {
        let model = Arc::new(ScriptedModel::new(&[
            "Action: delete_meeting\nAction Input: evt1",
            "Final Answer: I cannot do that.",
        ]));
        let agent = agent_with(model.clone(), FakeCalendar::default());

        assert_eq!(agent.run("Delete evt1").await, "I cannot do that.");
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[1].contains(
            "Observation: delete_meeting is not a valid tool, try one of [get_next_meeting, get_meetings_for_date, search_meetings, get_meeting_by_id]."
        ));
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let step = "Action: search_meetings\nAction Input: standup";
        let model = Arc::new(ScriptedModel::new(&[step; 6]));
        let agent = agent_with(model.clone(), FakeCalendar::default());

        assert_eq!(agent.run("Find standups").await, ITERATION_LIMIT_MESSAGE);
        assert_eq!(model.prompts.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_errors_are_folded_into_answer() {
        let model = Arc::new(ScriptedModel::new(&["I have no idea."]));
        let agent = agent_with(model, FakeCalendar::default());
        assert!(agent
            .run("?")
            .await
            .starts_with("Error executing agent: Could not parse LLM output"));

        let model = Arc::new(ScriptedModel::new(&[]));
        let agent = agent_with(model, FakeCalendar::default());
        assert_eq!(
            agent.run("?").await,
            "Error executing agent: LLM returned no choices"
        );
    }
}
