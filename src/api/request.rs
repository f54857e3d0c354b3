//! API request types
//!
//! One JSON object per request, discriminated by `op`.

use serde::Deserialize;

use super::errors::{ApiError, ApiResult};

/// A question about one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub doc_id: String,
    pub question: String,
}

/// An operation on one stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub doc_id: String,
}

/// Parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Query(QuestionRequest),
    Explain(QuestionRequest),
    Documents,
    Facts(DocumentRequest),
    Delete(DocumentRequest),
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    op: String,
    #[serde(default)]
    doc_id: Option<String>,
    #[serde(default)]
    question: Option<String>,
}

impl RawRequest {
    fn doc_id(&mut self) -> ApiResult<String> {
        self.doc_id
            .take()
            .ok_or_else(|| ApiError::invalid_request("Missing doc_id"))
    }

    fn question_request(mut self) -> ApiResult<QuestionRequest> {
        let doc_id = self.doc_id()?;
        let question = self
            .question
            .ok_or_else(|| ApiError::invalid_request("Missing question"))?;
        Ok(QuestionRequest { doc_id, question })
    }

    fn document_request(mut self) -> ApiResult<DocumentRequest> {
        Ok(DocumentRequest {
            doc_id: self.doc_id()?,
        })
    }
}

impl Request {
    /// Parse a request from a JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let raw: RawRequest = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        match raw.op.as_str() {
            "query" => Ok(Request::Query(raw.question_request()?)),
            "explain" => Ok(Request::Explain(raw.question_request()?)),
            "documents" => Ok(Request::Documents),
            "facts" => Ok(Request::Facts(raw.document_request()?)),
            "delete" => Ok(Request::Delete(raw.document_request()?)),
            other => Err(ApiError::unknown_operation(other)),
        }
    }
}
