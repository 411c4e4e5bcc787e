//! Meeting type detection used to tailor preparation questions.

use serde::{Deserialize, Serialize};

use crate::calendar::Meeting;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Interview,
    Standup,
    Review,
    Sales,
    OneOnOne,
    Planning,
    General,
}

/// Keyword table, checked in order; the first hit wins.
const KEYWORDS: &[(MeetingType, &[&str])] = &[
    (
        MeetingType::Interview,
        &["interview", "screening", "candidate", "hiring", "recruit"],
    ),
    (MeetingType::Standup, &["standup", "stand-up", "daily sync", "scrum"]),
    (
        MeetingType::OneOnOne,
        &["1:1", "1-1", "1on1", "one on one", "one-on-one"],
    ),
    (
        MeetingType::Review,
        &["review", "retro", "retrospective", "post-mortem", "postmortem"],
    ),
    (
        MeetingType::Sales,
        &["sales", "demo call", "prospect", "discovery call", "pitch", "proposal", "client call"],
    ),
    (
        MeetingType::Planning,
        &["planning", "roadmap", "kickoff", "kick-off", "sprint", "strategy"],
    ),
];

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::Standup => "standup",
            Self::Review => "review",
            Self::Sales => "sales",
            Self::OneOnOne => "one_on_one",
            Self::Planning => "planning",
            Self::General => "general",
        }
    }

    pub fn classify(meeting: &Meeting) -> Self {
        let title = meeting.title.to_lowercase();
        let description = meeting.description.to_lowercase();

        // Title is the stronger signal, so it is scanned on its own first.
        for text in [&title, &description] {
            for (kind, words) in KEYWORDS {
                if words.iter().any(|w| text.contains(w)) {
                    return *kind;
                }
            }
        }

        if meeting.person_names.len() == 1 {
            Self::OneOnOne
        } else {
            Self::General
        }
    }

    /// What the preparation questions should concentrate on.
    pub fn focus(&self) -> &'static str {
        match self {
            Self::Interview => {
                "questions to ask the candidate about their experience, technical depth, \
                 motivation and fit, plus what the candidate is likely to ask back"
            }
            Self::Standup => "blockers, progress since the last sync and dependencies on others",
            Self::Review => {
                "what went well, what did not, open decisions and follow-up owners"
            }
            Self::Sales => {
                "the prospect's needs, budget, decision process, objections and next steps"
            }
            Self::OneOnOne => {
                "the relationship, current priorities, feedback in both directions and career goals"
            }
            Self::Planning => "goals, scope, milestones, risks and who owns what",
            Self::General => "the purpose of the meeting, expected outcomes and open questions",
        }
    }
}
