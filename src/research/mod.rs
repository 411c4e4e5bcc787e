//! Attendee research and meeting briefing generation.
//!
//! [`Researcher`] is the seam the briefing layer calls; [`LlmResearcher`]
//! implements it with a chat model.

mod meeting_type;
pub mod prompts;

pub use meeting_type::MeetingType;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::calendar::{Attendee, AttendeeResearch, Meeting};
use crate::llm::{ChatMessage, ChatModel};
use prompts::JsonExtractor;

#[async_trait]
pub trait Researcher: Send + Sync {
    /// Research every attendee other than the calendar owner, in calendar order.
    async fn research_attendees(&self, meeting: &Meeting) -> Result<Vec<AttendeeResearch>>;

    async fn meeting_summary(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<String>;

    /// Questions tailored to the detected [`MeetingType`].
    async fn preparation_questions(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct ResearchReply {
    #[serde(default)]
    found_info: bool,
    #[serde(default)]
    summary: String,
    company: Option<String>,
    title: Option<String>,
}

pub struct LlmResearcher {
    model: Arc<dyn ChatModel>,
    extractor: JsonExtractor,
}

impl LlmResearcher {
    pub fn new(model: Arc<dyn ChatModel>) -> Result<Self> {
        Ok(Self {
            model,
            extractor: JsonExtractor::new()?,
        })
    }

    async fn ask(&self, prompt: String) -> Result<String> {
        let messages = [
            ChatMessage::system(prompts::SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];
        let reply = self
            .model
            .complete(&messages, &[])
            .await
            .with_context(|| format!("{} request failed", self.model.model_name()))?;
        Ok(reply.trim().to_string())
    }
}

#[async_trait]
impl Researcher for LlmResearcher {
    async fn research_attendees(&self, meeting: &Meeting) -> Result<Vec<AttendeeResearch>> {
        let mut results = Vec::new();

        for attendee in meeting.attendees.iter().filter(|a| !a.is_self) {
            debug!("Researching attendee {}", attendee.email);
            let reply = self
                .ask(prompts::attendee_research_prompt(meeting, attendee))
                .await?;
            results.push(research_from_reply(&self.extractor, attendee.clone(), &reply));
        }

        info!(
            "Researched {} attendees for '{}' ({} with info)",
            results.len(),
            meeting.title,
            results.iter().filter(|r| r.found_info).count()
        );
        Ok(results)
    }

    async fn meeting_summary(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<String> {
        self.ask(prompts::meeting_summary_prompt(meeting, research))
            .await
    }

    async fn preparation_questions(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<String> {
        let meeting_type = MeetingType::classify(meeting);
        debug!(
            "Meeting '{}' classified as {}",
            meeting.title,
            meeting_type.as_str()
        );
        self.ask(prompts::preparation_questions_prompt(
            meeting,
            research,
            meeting_type,
        ))
        .await
    }
}

fn research_from_reply(
    extractor: &JsonExtractor,
    mut attendee: Attendee,
    reply: &str,
) -> AttendeeResearch {
    let parsed = extractor
        .extract(reply)
        .and_then(|json| serde_json::from_str::<ResearchReply>(json).ok());

    let Some(parsed) = parsed else {
        warn!(
            "Could not parse research reply for {}, keeping raw text",
            attendee.email
        );
        return AttendeeResearch {
            attendee,
            research_summary: reply.to_string(),
            found_info: false,
        };
    };

    if let Some(company) = parsed.company.filter(|c| is_known(c)) {
        attendee.company = Some(company);
    }
    if let Some(title) = parsed.title.filter(|t| is_known(t)) {
        attendee.title = Some(title);
    }

    AttendeeResearch {
        attendee,
        research_summary: parsed.summary.trim().to_string(),
        found_info: parsed.found_info,
    }
}

/// Models like to spell "unknown" in creative ways.
fn is_known(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    !(v.is_empty() || v == "null" || v == "unknown" || v == "n/a" || v == "none")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use std::sync::Mutex;

    /// Replays canned replies and records the prompts it was given.
    struct ScriptedChat {
        replies: Mutex<Vec<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            _stop: &[String],
        ) -> Result<String, LlmError> {
            if let Some(last) = messages.last() {
                self.prompts.lock().unwrap().push(last.content.clone());
            }
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }

    fn meeting_with_attendees() -> Meeting {
        let mut meeting = Meeting::new("evt1", "Interview: Jane Doe");
        meeting.attendees = vec![
            Attendee::new("me@acme.io", Some("Me".to_string())).own(),
            Attendee::new("jane@initech.com", Some("Jane Doe".to_string())),
            Attendee::new("bob@gmail.com", None),
        ];
        meeting.person_names = vec!["Jane Doe".to_string(), "bob".to_string()];
        meeting
    }

    #[tokio::test]
    async fn test_research_skips_self_and_parses_replies() {
        let chat = Arc::new(ScriptedChat::new(vec![
            Ok("```json\n{\"found_info\": true, \"summary\": \"Staff engineer on payments.\", \"company\": \"Initech Corp\", \"title\": \"Staff Engineer\"}\n```".to_string()),
            Ok("I don't know who this is.".to_string()),
        ]));
        let researcher = LlmResearcher::new(chat.clone()).unwrap();

        let results = researcher
            .research_attendees(&meeting_with_attendees())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].attendee.email, "jane@initech.com");
        assert!(results[0].found_info);
        assert_eq!(results[0].research_summary, "Staff engineer on payments.");
        assert_eq!(results[0].attendee.company.as_deref(), Some("Initech Corp"));
        assert_eq!(results[0].attendee.title.as_deref(), Some("Staff Engineer"));

        assert_eq!(results[1].attendee.email, "bob@gmail.com");
        assert!(!results[1].found_info);
        assert_eq!(results[1].research_summary, "I don't know who this is.");

        assert_eq!(chat.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_research_error_propagates() {
        let chat = Arc::new(ScriptedChat::new(vec![Err(LlmError::MissingApiKey)]));
        let researcher = LlmResearcher::new(chat).unwrap();

        let err = researcher
            .research_attendees(&meeting_with_attendees())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("scripted request failed"));
    }

    #[tokio::test]
    async fn test_questions_use_meeting_type() {
        let chat = Arc::new(ScriptedChat::new(vec![Ok("  1. Why us?\n".to_string())]));
        let researcher = LlmResearcher::new(chat.clone()).unwrap();

        let questions = researcher
            .preparation_questions(&meeting_with_attendees(), &[])
            .await
            .unwrap();

        assert_eq!(questions, "1. Why us?");
        let prompts = chat.prompts.lock().unwrap();
        assert!(prompts[0].contains("interview meeting"));
    }

    #[test]
    fn test_unknown_values_do_not_override() {
        let attendee = Attendee::new("jane@initech.com", None);
        let result = research_from_reply(
            &JsonExtractor::new().unwrap(),
            attendee,
            r#"{"found_info": false, "summary": "", "company": "Unknown", "title": null}"#,
        );
        assert_eq!(result.attendee.company.as_deref(), Some("Initech"));
        assert!(result.attendee.title.is_none());
        assert!(!result.found_info);
    }
}
