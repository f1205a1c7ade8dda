use serde::Deserialize;
use validator::Validate;

/// `?sessionId=` where the session is mandatory.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    #[validate(
        required(message = "sessionId is required"),
        length(min = 1, max = 128, message = "sessionId must be 1-128 characters")
    )]
    pub session_id: Option<String>,
}

/// `GET /api/words`; without a session the whole playable list is returned.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WordsQuery {
    #[serde(rename = "sessionId")]
    #[validate(length(min = 1, max = 128, message = "sessionId must be 1-128 characters"))]
    pub session_id: Option<String>,
}

/// `?count=` is kept raw; anything that is not a count falls back to the default.
#[derive(Debug, Clone, Deserialize)]
pub struct DistractorQuery {
    pub count: Option<String>,
}

impl DistractorQuery {
    pub fn requested_count(&self) -> Option<usize> {
        self.count.as_deref()?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(count: Option<&str>) -> DistractorQuery {
        DistractorQuery {
            count: count.map(str::to_string),
        }
    }

    #[test]
    fn unparsable_count_is_treated_as_absent() {
        assert_eq!(query(Some("5")).requested_count(), Some(5));
        assert_eq!(query(Some(" 2 ")).requested_count(), Some(2));
        assert_eq!(query(Some("abc")).requested_count(), None);
        assert_eq!(query(Some("-1")).requested_count(), None);
        assert_eq!(query(Some("")).requested_count(), None);
        assert_eq!(query(None).requested_count(), None);
    }
}
