//! Boundary decoding: raw service replies into typed outcomes.

use kidsafe_core::{AnalysisResult, AnalyzeOutcome, CatalogEntry, ChatOutcome, SearchOutcome};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{FailureKind, ServiceError};

const UNKNOWN_ERROR: &str = "unknown error";

/// Status code and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawReply {
    pub(crate) status: u16,
    pub(crate) body: Vec<u8>,
}

impl RawReply {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn http_error(&self) -> ServiceError {
        ServiceError::new(
            FailureKind::HttpStatus(self.status),
            format!("service replied with status {}", self.status),
        )
    }

    fn parse<T: DeserializeOwned>(&self) -> Result<T, ServiceError> {
        serde_json::from_slice(&self.body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    found: bool,
    ingredients: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeReply {
    success: bool,
    cereal_name: Option<String>,
    ingredients: Option<String>,
    analysis: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    success: bool,
    answer: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusReply {
    #[serde(default)]
    initialized: bool,
}

pub(crate) fn decode_catalog(reply: &RawReply) -> Result<Vec<CatalogEntry>, ServiceError> {
    if !reply.is_success() {
        return Err(reply.http_error());
    }
    reply.parse()
}

pub(crate) fn decode_status(reply: &RawReply) -> Result<bool, ServiceError> {
    if !reply.is_success() {
        return Err(reply.http_error());
    }
    reply.parse::<StatusReply>().map(|status| status.initialized)
}

/// Any non-2xx search reply is a transport failure.
pub(crate) fn decode_search(reply: &RawReply) -> Result<SearchOutcome, ServiceError> {
    if !reply.is_success() {
        return Err(reply.http_error());
    }
    let parsed: SearchReply = reply.parse()?;
    let ingredients = parsed
        .ingredients
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    match (parsed.found, ingredients) {
        (true, Some(ingredients)) => Ok(SearchOutcome::Found { ingredients }),
        _ => Ok(SearchOutcome::NotFound {
            message: parsed.message,
        }),
    }
}

/// A non-2xx reply with a `{success: false, error}` body is a rejection,
/// not a transport failure.
pub(crate) fn decode_analyze(
    reply: &RawReply,
    product_name: &str,
    ingredients: &str,
) -> Result<AnalyzeOutcome, ServiceError> {
    let parsed: AnalyzeReply = match reply.parse() {
        Ok(parsed) => parsed,
        Err(_) if !reply.is_success() => return Err(reply.http_error()),
        Err(err) => return Err(err),
    };

    if !parsed.success {
        return Ok(AnalyzeOutcome::Rejected {
            error: parsed.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        });
    }
    if !reply.is_success() {
        return Err(reply.http_error());
    }

    let analysis = parsed.analysis.ok_or_else(|| {
        ServiceError::new(FailureKind::Decode, "successful analysis without text")
    })?;
    Ok(AnalyzeOutcome::Analyzed(AnalysisResult {
        success: true,
        cereal_name: parsed
            .cereal_name
            .unwrap_or_else(|| product_name.to_string()),
        ingredients: parsed
            .ingredients
            .unwrap_or_else(|| ingredients.to_string()),
        analysis,
        error: None,
    }))
}

pub(crate) fn decode_chat(reply: &RawReply) -> Result<ChatOutcome, ServiceError> {
    let parsed: ChatReply = match reply.parse() {
        Ok(parsed) => parsed,
        Err(_) if !reply.is_success() => return Err(reply.http_error()),
        Err(err) => return Err(err),
    };

    if !parsed.success {
        return Ok(ChatOutcome::Rejected {
            error: parsed.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        });
    }
    if !reply.is_success() {
        return Err(reply.http_error());
    }

    parsed
        .answer
        .map(ChatOutcome::Answered)
        .ok_or_else(|| ServiceError::new(FailureKind::Decode, "successful chat reply without answer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> RawReply {
        RawReply {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn search_found_with_blank_ingredients_is_not_found() {
        let outcome = decode_search(&reply(200, r#"{"found": true, "ingredients": "  "}"#)).unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound { message: None });
    }

    #[test]
    fn search_error_status_is_transport_failure() {
        let body = r#"{"found": false, "message": "Error searching for product."}"#;
        let err = decode_search(&reply(500, body)).unwrap_err();
        assert_eq!(err.kind, FailureKind::HttpStatus(500));
    }

    #[test]
    fn analyze_error_status_with_body_is_rejection() {
        let body = r#"{"success": false, "error": "System not initialized."}"#;
        let outcome = decode_analyze(&reply(400, body), "X", "y").unwrap();
        assert_eq!(
            outcome,
            AnalyzeOutcome::Rejected {
                error: "System not initialized.".to_string()
            }
        );
    }

    #[test]
    fn analyze_error_status_without_body_is_http_failure() {
        let err = decode_analyze(&reply(502, "<html>bad gateway</html>"), "X", "y").unwrap_err();
        assert_eq!(err.kind, FailureKind::HttpStatus(502));
    }

    #[test]
    fn analyze_success_requires_text() {
        let err = decode_analyze(&reply(200, r#"{"success": true}"#), "X", "y").unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
    }

    #[test]
    fn analyze_fills_missing_names_from_request() {
        let outcome =
            decode_analyze(&reply(200, r#"{"success": true, "analysis": "ok"}"#), "X", "y").unwrap();
        let AnalyzeOutcome::Analyzed(result) = outcome else {
            panic!("expected analysis");
        };
        assert_eq!(result.cereal_name, "X");
        assert_eq!(result.ingredients, "y");
    }

    #[test]
    fn chat_rejection_without_error_text_gets_placeholder() {
        let outcome = decode_chat(&reply(500, r#"{"success": false}"#)).unwrap();
        assert_eq!(
            outcome,
            ChatOutcome::Rejected {
                error: UNKNOWN_ERROR.to_string()
            }
        );
    }

    #[test]
    fn status_defaults_to_not_initialized() {
        assert!(!decode_status(&reply(200, "{}")).unwrap());
    }
}
