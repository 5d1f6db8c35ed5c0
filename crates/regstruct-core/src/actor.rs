//! Key actor roles mentioned in the regulation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    DataSubject,
    Controller,
    Processor,
    Authority,
    ThirdParty,
    Recipient,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown actor type '{0}' (expected one of: data_subject, controller, processor, authority, third_party, recipient)")]
pub struct UnknownActorType(pub String);

impl ActorType {
    /// All actor types in scan order.
    pub const ALL: [ActorType; 6] = [
        Self::DataSubject,
        Self::Controller,
        Self::Processor,
        Self::Authority,
        Self::ThirdParty,
        Self::Recipient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataSubject => "data_subject",
            Self::Controller => "controller",
            Self::Processor => "processor",
            Self::Authority => "authority",
            Self::ThirdParty => "third_party",
            Self::Recipient => "recipient",
        }
    }

    /// Role name as it reads in running text ("data_subject" → "data subject").
    pub fn phrase(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Default lowercase keywords that signal a mention of this actor.
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::DataSubject => &[
                "data subject",
                "natural person",
                "concerned person",
                "individual",
            ],
            Self::Controller => &["controller", "joint controller"],
            Self::Processor => &["processor", "sub-processor"],
            Self::Authority => &[
                "supervisory authority",
                "competent authority",
                "lead authority",
            ],
            Self::ThirdParty => &["third party", "third-party", "third country"],
            Self::Recipient => &["recipient"],
        }
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorType {
    type Err = UnknownActorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownActorType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        for actor in ActorType::ALL {
            assert_eq!(actor.as_str().parse::<ActorType>(), Ok(actor));
        }
    }

    #[test]
    fn unknown_role_is_error() {
        let err = "regulator".parse::<ActorType>().unwrap_err();
        assert!(err.to_string().contains("regulator"));
    }

    #[test]
    fn phrase_replaces_underscores() {
        assert_eq!(ActorType::DataSubject.phrase(), "data subject");
        assert_eq!(ActorType::Controller.phrase(), "controller");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ActorType::ThirdParty).unwrap();
        assert_eq!(json, "\"third_party\"");
    }
}
