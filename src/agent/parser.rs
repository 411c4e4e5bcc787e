//! Parsing of ReAct-formatted model output.

use regex::Regex;
use thiserror::Error;

const FINAL_ANSWER: &str = "Final Answer:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    /// Call `tool` with `input`. `log` is the raw model text for the scratchpad.
    Action {
        tool: String,
        input: String,
        log: String,
    },
    Finish {
        output: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Parsing LLM output produced both a final answer and a parse-able action: {0}")]
    Ambiguous(String),

    #[error("Could not parse LLM output: `{0}`")]
    Unparseable(String),
}

/// Splits a model turn into a tool call or a final answer.
pub struct ReActParser {
    action_regex: Regex,
}

impl ReActParser {
    pub fn new() -> Result<Self, regex::Error> {
        let action_regex = Regex::new(
            r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)",
        )?;
        Ok(Self { action_regex })
    }

    pub fn parse(&self, text: &str) -> Result<AgentStep, ParseError> {
        let has_final = text.contains(FINAL_ANSWER);

        if let Some(caps) = self.action_regex.captures(text) {
            if has_final {
                return Err(ParseError::Ambiguous(text.to_string()));
            }
            let tool = caps.get(1).map_or("", |m| m.as_str()).trim();
            let input = caps
                .get(2)
                .map_or("", |m| m.as_str())
                .trim()
                .trim_matches(' ')
                .trim_matches('"');
            return Ok(AgentStep::Action {
                tool: tool.to_string(),
                input: input.to_string(),
                log: text.to_string(),
            });
        }

        if has_final {
            let output = text
                .rsplit(FINAL_ANSWER)
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            return Ok(AgentStep::Finish { output });
        }

        Err(ParseError::Unparseable(text.to_string()))
    }
}
