//! Request handler for akili
//!
//! Flow for a question:
//! 1. Parse and bound the request
//! 2. Fetch the document's facts from the store
//! 3. Run the verification engine
//! 4. Count and log the outcome
//!
//! The handler holds no mutable state of its own; the store and metrics
//! are shared by reference and safe to use from several threads.

use serde::Serialize;
use serde_json::{json, Value};

use crate::canonical::FactSet;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::store::{FactStore, StoreError};
use crate::verify::{self, Verdict};

use super::errors::{ApiError, ApiResult};
use super::request::{DocumentRequest, QuestionRequest, Request};
use super::response::Response;

/// Default bound on question length in bytes
pub const DEFAULT_MAX_QUESTION_BYTES: usize = 4096;

fn to_data<T: Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))
}

/// JSON request handler over a fact store
pub struct RequestHandler<'a> {
    store: &'a dyn FactStore,
    metrics: &'a MetricsRegistry,
    max_question_bytes: usize,
}

impl<'a> RequestHandler<'a> {
    pub fn new(store: &'a dyn FactStore, metrics: &'a MetricsRegistry) -> Self {
        Self {
            store,
            metrics,
            max_question_bytes: DEFAULT_MAX_QUESTION_BYTES,
        }
    }

    pub fn with_max_question_bytes(mut self, max: usize) -> Self {
        self.max_question_bytes = max;
        self
    }

    /// Handle a raw JSON request string
    pub fn handle(&self, json_request: &str) -> Response {
        let request = match Request::parse(json_request) {
            Ok(r) => r,
            Err(e) => return Response::error(&e),
        };
        Response::from_result(self.dispatch(request))
    }

    /// Handle an already parsed request
    pub fn dispatch(&self, request: Request) -> ApiResult<Value> {
        match request {
            Request::Query(r) => self.handle_query(r),
            Request::Explain(r) => self.handle_explain(r),
            Request::Documents => self.handle_documents(),
            Request::Facts(r) => self.handle_facts(r),
            Request::Delete(r) => self.handle_delete(r),
        }
    }

    fn load_facts(&self, doc_id: &str) -> ApiResult<FactSet> {
        self.store.get_facts(doc_id).map_err(|e| self.store_failure(doc_id, e))
    }

    fn store_failure(&self, doc_id: &str, err: StoreError) -> ApiError {
        if matches!(err, StoreError::Corrupted(_)) {
            let reason = err.to_string();
            log_event_with_fields(Event::StoreCorruption, &[("doc_id", doc_id), ("reason", &reason)]);
        }
        if !matches!(err, StoreError::NotFound(_) | StoreError::InvalidDocId(_)) {
            self.metrics.increment_store_errors();
        }
        ApiError::from_store_error(err)
    }

    fn check_question(&self, question: &str) -> ApiResult<()> {
        if question.len() > self.max_question_bytes {
            self.metrics.increment_invalid_inputs();
            return Err(ApiError::question_too_large(question.len(), self.max_question_bytes));
        }
        Ok(())
    }

    fn record_verdict(&self, doc_id: &str, verdict: &Verdict) {
        match verdict {
            Verdict::Answer(answer) => {
                self.metrics.increment_answers();
                let proof_count = answer.proof.len().to_string();
                log_event_with_fields(
                    Event::QueryAnswered,
                    &[
                        ("doc_id", doc_id),
                        ("rule", answer.rule.as_str()),
                        ("proof_points", &proof_count),
                    ],
                );
            }
            Verdict::Refuse(refusal) => {
                self.metrics.increment_refusals(refusal.reason_kind);
                log_event_with_fields(
                    Event::QueryRefused,
                    &[("doc_id", doc_id), ("reason_kind", refusal.reason_kind.as_str())],
                );
            }
        }
    }

    fn invalid_question(&self, doc_id: &str, err: verify::VerifyError) -> ApiError {
        self.metrics.increment_invalid_inputs();
        log_event_with_fields(Event::QueryInvalid, &[("doc_id", doc_id), ("reason", err.message())]);
        ApiError::from_verify_error(err)
    }

    /// Flow: bound question, fetch facts, verify, record
    fn handle_query(&self, req: QuestionRequest) -> ApiResult<Value> {
        self.metrics.increment_questions();
        self.check_question(&req.question)?;
        log_event_with_fields(
            Event::QueryReceived,
            &[("doc_id", &req.doc_id), ("question", &req.question)],
        );

        let facts = self.load_facts(&req.doc_id)?;
        let verdict = verify::verify_facts(&req.question, &facts)
            .map_err(|e| self.invalid_question(&req.doc_id, e))?;

        self.record_verdict(&req.doc_id, &verdict);
        to_data(&verdict)
    }

    fn handle_explain(&self, req: QuestionRequest) -> ApiResult<Value> {
        self.check_question(&req.question)?;
        log_event_with_fields(Event::ExplainBegin, &[("doc_id", &req.doc_id)]);

        let facts = self.load_facts(&req.doc_id)?;
        let trace = verify::explain(&req.question, &facts)
            .map_err(|e| self.invalid_question(&req.doc_id, e))?;

        let steps = trace.steps.len().to_string();
        log_event_with_fields(Event::ExplainComplete, &[("doc_id", &req.doc_id), ("steps", &steps)]);

        Ok(json!({
            "trace": to_data(&trace)?,
            "text": trace.to_string(),
        }))
    }

    fn handle_documents(&self) -> ApiResult<Value> {
        let documents = self
            .store
            .list_documents()
            .map_err(|e| self.store_failure("*", e))?;
        to_data(&documents)
    }

    fn handle_facts(&self, req: DocumentRequest) -> ApiResult<Value> {
        let facts = self.load_facts(&req.doc_id)?;
        to_data(&facts)
    }

    fn handle_delete(&self, req: DocumentRequest) -> ApiResult<Value> {
        self.store
            .delete_document(&req.doc_id)
            .map_err(|e| self.store_failure(&req.doc_id, e))?;
        self.metrics.increment_documents_deleted();
        log_event_with_fields(Event::DocumentDeleted, &[("doc_id", &req.doc_id)]);
        Ok(json!({ "doc_id": req.doc_id, "deleted": true }))
    }
}
