use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/answers`.
///
/// Fields are optional at the serde level so that a missing field is reported
/// per field by the validator instead of as an opaque parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[validate(
        required(message = "wordId is required"),
        length(min = 1, max = 64, message = "wordId must be 1-64 characters")
    )]
    pub word_id: Option<String>,

    #[validate(required(message = "isCorrect is required"))]
    pub is_correct: Option<bool>,

    #[validate(
        required(message = "sessionId is required"),
        length(min = 1, max = 128, message = "sessionId must be 1-128 characters")
    )]
    pub session_id: Option<String>,
}

/// A validated submission, ready for the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub word_id: String,
    pub session_id: String,
    pub is_correct: bool,
}

impl SubmitAnswerRequest {
    /// Consumes a request that already passed `validate()`.
    pub fn into_new_answer(self) -> Option<NewAnswer> {
        Some(NewAnswer {
            word_id: self.word_id?,
            session_id: self.session_id?,
            is_correct: self.is_correct?,
        })
    }
}

/// One learner interaction outcome. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    pub id: String,
    pub word_id: String,
    pub session_id: String,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_reported_per_field() {
        let req: SubmitAnswerRequest =
            serde_json::from_str(r#"{"wordId": "w-1"}"#).expect("partial body should parse");

        let errors = req.validate().expect_err("validation should fail");
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);

        let messages: Vec<String> = fields
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .collect();
        assert!(messages.contains(&"isCorrect is required".to_string()));
        assert!(messages.contains(&"sessionId is required".to_string()));
    }

    #[test]
    fn empty_session_id_is_rejected() {
        let req: SubmitAnswerRequest = serde_json::from_str(
            r#"{"wordId": "w-1", "isCorrect": true, "sessionId": ""}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn valid_request_converts() {
        let req: SubmitAnswerRequest = serde_json::from_str(
            r#"{"wordId": "w-1", "isCorrect": false, "sessionId": "session-1"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let answer = req.into_new_answer().unwrap();
        assert_eq!(answer.word_id, "w-1");
        assert_eq!(answer.session_id, "session-1");
        assert!(!answer.is_correct);
    }

    #[test]
    fn event_uses_camel_case_on_the_wire() {
        let event = AnswerEvent {
            id: "a-1".to_string(),
            word_id: "w-1".to_string(),
            session_id: "s-1".to_string(),
            is_correct: true,
            answered_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["wordId"], "w-1");
        assert_eq!(json["isCorrect"], true);
        assert!(json.get("answeredAt").is_some());
    }
}
