//! CLI command implementations
//!
//! Every command loads and validates the configuration first. Commands
//! other than `init` require an initialized data directory. Requests are
//! routed through the same `RequestHandler` the library exposes, so the
//! CLI prints exactly the response a caller of `handle` would get.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{DocumentRequest, QuestionRequest, Request, RequestHandler, Response};
use crate::canonical::{canonicalize_document, DocumentExtraction, Rejection};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};
use crate::store::{generate_doc_id, validate_doc_id, DocumentSummary, FactStore, FileFactStore, NewDocument};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_json, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
///
/// One metrics registry lives for the whole command; its counters are
/// logged as a `METRICS` line when the command ends, success or not.
pub fn run_command(cmd: Command) -> CliResult<()> {
    let name = cmd.name();
    let metrics = MetricsRegistry::new();
    let result = match cmd {
        Command::Init { config } => init(&config),
        Command::Ingest {
            config,
            file,
            doc_id,
        } => ingest(&config, &file, doc_id, &metrics),
        Command::Query {
            config,
            doc_id,
            question,
        } => query(&config, doc_id, question, &metrics),
        Command::Explain {
            config,
            doc_id,
            question,
            text,
        } => explain(&config, doc_id, question, text, &metrics),
        Command::Documents { config } => documents(&config, &metrics),
        Command::Facts { config, doc_id } => facts(&config, doc_id, &metrics),
        Command::Delete { config, doc_id } => delete(&config, doc_id, &metrics),
    };
    metrics.report(name);
    result
}

/// Check if a data directory is initialized
fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join("documents").is_dir()
}

/// Load config and open the store of an initialized data directory
fn open_store(config_path: &Path) -> CliResult<(Config, FileFactStore)> {
    let config = Config::load(config_path)?;
    log_event_with_fields(Event::ConfigLoaded, &[("data_dir", &config.data_dir)]);

    if !is_initialized(config.data_path()) {
        return Err(CliError::not_initialized());
    }
    let store = FileFactStore::open(config.data_path())?;
    log_event_with_fields(Event::StoreOpened, &[("data_dir", &config.data_dir)]);
    Ok((config, store))
}

/// Run one request through the handler and print the response
fn respond(config: &Config, store: &FileFactStore, metrics: &MetricsRegistry, request: Request) -> Response {
    let handler = RequestHandler::new(store, metrics).with_max_question_bytes(config.max_question_bytes);
    Response::from_result(handler.dispatch(request))
}

/// Question from flags, or one JSON request `{doc_id, question}` on stdin
fn question_request(doc_id: Option<String>, question: Option<String>) -> CliResult<QuestionRequest> {
    if let (Some(doc_id), Some(question)) = (doc_id, question) {
        return Ok(QuestionRequest { doc_id, question });
    }

    let request = read_request()?;
    question_from_value(&request)
}

fn question_from_value(request: &Value) -> CliResult<QuestionRequest> {
    let field = |name: &str| -> CliResult<String> {
        request
            .get(name)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| CliError::io_error(format!("Request missing string field '{}'", name)))
    };
    Ok(QuestionRequest {
        doc_id: field("doc_id")?,
        question: field("question")?,
    })
}

/// Initialize a new akili data directory
///
/// Creates `<data_dir>/documents`. Writes no records.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    FileFactStore::open(data_dir)
        .map_err(|e| CliError::config_error(format!("Failed to create data directory: {}", e)))?;

    write_response(json!({"initialized": true, "data_dir": config.data_dir}))
}

/// Outcome of ingesting one extraction
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub document: DocumentSummary,
    pub rejected: Vec<Rejection>,
}

/// Canonicalizes an extraction and stores the accepted facts.
///
/// Doc id precedence: explicit argument, then the extraction's own
/// `doc_id`, then a generated one. Every rejected entry is logged and
/// counted; rejections never fail the ingest.
pub fn ingest_extraction(
    store: &dyn FactStore,
    metrics: &MetricsRegistry,
    extraction: &DocumentExtraction,
    doc_id: Option<String>,
) -> CliResult<IngestReport> {
    let doc_id = doc_id
        .or_else(|| extraction.doc_id.clone())
        .unwrap_or_else(generate_doc_id);
    validate_doc_id(&doc_id)?;

    let canonical = canonicalize_document(extraction, &doc_id)
        .map_err(|e| CliError::ingest_failed(format!("{} ({})", e, e.code())))?;

    for rejection in &canonical.rejected {
        let page = rejection.page.to_string();
        log_event_with_fields(
            Event::FactRejected,
            &[
                ("code", rejection.code),
                ("doc_id", &doc_id),
                ("id", &rejection.id),
                ("page", &page),
                ("reason", &rejection.reason),
                ("source_type", rejection.source_type.as_str()),
            ],
        );
    }
    metrics.add_facts_rejected(canonical.rejected.len() as u64);

    let fact_count = canonical.facts.len();
    let page_count = u32::try_from(extraction.pages.len())
        .map_err(|_| CliError::ingest_failed(format!("{} pages do not fit a page count", extraction.pages.len())))?;

    let mut doc = NewDocument::new(doc_id.clone(), canonical.facts).with_page_count(page_count);
    if let Some(filename) = &extraction.filename {
        doc = doc.with_filename(filename.clone());
    }
    let document = store.put_document(doc)?;

    metrics.increment_documents_stored();
    metrics.add_facts_stored(fact_count as u64);
    let facts = fact_count.to_string();
    let rejected = canonical.rejected.len().to_string();
    log_event_with_fields(
        Event::DocumentStored,
        &[("doc_id", &doc_id), ("facts", &facts), ("rejected", &rejected)],
    );

    Ok(IngestReport {
        document,
        rejected: canonical.rejected,
    })
}

/// Load an extraction file, canonicalize it and store the facts
pub fn ingest(
    config_path: &Path,
    file: &Path,
    doc_id: Option<String>,
    metrics: &MetricsRegistry,
) -> CliResult<()> {
    let (config, store) = open_store(config_path)?;
    let file_name = file.display().to_string();
    let scope = ObservationScope::with_fields("INGEST", &[("file", &file_name)]);

    let size = match fs::metadata(file) {
        Ok(meta) => meta.len(),
        Err(e) => {
            scope.fail(&e.to_string());
            return Err(CliError::io_error(format!("Failed to read {}: {}", file_name, e)));
        }
    };
    if size > config.max_extraction_bytes {
        let reason = format!(
            "Extraction file is {} bytes (max: {})",
            size, config.max_extraction_bytes
        );
        scope.fail(&reason);
        return Err(CliError::ingest_failed(reason));
    }

    let extraction: DocumentExtraction = match fs::read_to_string(file)
        .map_err(CliError::from)
        .and_then(|content| serde_json::from_str::<DocumentExtraction>(&content).map_err(CliError::from))
    {
        Ok(extraction) => extraction,
        Err(e) => {
            scope.fail(e.message());
            return Err(CliError::ingest_failed(format!("Invalid extraction file: {}", e.message())));
        }
    };

    let report = match ingest_extraction(&store, metrics, &extraction, doc_id) {
        Ok(report) => report,
        Err(e) => {
            scope.fail(e.message());
            return Err(e);
        }
    };

    scope.complete_with_fields(&[("doc_id", &report.document.doc_id)]);
    write_response(serde_json::to_value(&report)?)
}

/// Answer a single question and exit
pub fn query(
    config_path: &Path,
    doc_id: Option<String>,
    question: Option<String>,
    metrics: &MetricsRegistry,
) -> CliResult<()> {
    let (config, store) = open_store(config_path)?;
    let request = Request::Query(question_request(doc_id, question)?);
    let response = respond(&config, &store, metrics, request);
    write_json(&response.to_json())
}

/// Trace a single question and exit
///
/// With `text`, prints the human-readable trace instead of the JSON response.
pub fn explain(
    config_path: &Path,
    doc_id: Option<String>,
    question: Option<String>,
    text: bool,
    metrics: &MetricsRegistry,
) -> CliResult<()> {
    let (config, store) = open_store(config_path)?;
    let request = Request::Explain(question_request(doc_id, question)?);
    let response = respond(&config, &store, metrics, request);

    if text {
        if let Some(trace) = response.data().and_then(|d| d.get("text")).and_then(Value::as_str) {
            let mut out = trace.to_string();
            if out.ends_with('\n') {
                out.pop();
            }
            return write_json(&out);
        }
    }
    write_json(&response.to_json())
}

/// List stored documents
pub fn documents(config_path: &Path, metrics: &MetricsRegistry) -> CliResult<()> {
    let (config, store) = open_store(config_path)?;
    let response = respond(&config, &store, metrics, Request::Documents);
    write_json(&response.to_json())
}

/// Print the canonical facts of a document
pub fn facts(config_path: &Path, doc_id: String, metrics: &MetricsRegistry) -> CliResult<()> {
    let (config, store) = open_store(config_path)?;
    let response = respond(&config, &store, metrics, Request::Facts(DocumentRequest { doc_id }));
    write_json(&response.to_json())
}

/// Delete a stored document
pub fn delete(config_path: &Path, doc_id: String, metrics: &MetricsRegistry) -> CliResult<()> {
    let (config, store) = open_store(config_path)?;
    let response = respond(&config, &store, metrics, Request::Delete(DocumentRequest { doc_id }));
    write_json(&response.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{PageExtraction, Point, UnitExtract};
    use crate::store::MemoryFactStore;
    use tempfile::TempDir;

    fn unit_extract(id: &str, value: Option<&str>) -> UnitExtract {
        UnitExtract {
            id: id.to_string(),
            label: Some("VCC".to_string()),
            value: value.map(Into::into),
            unit_of_measure: None,
            context: None,
            origin: Point::new(0.1, 0.2),
            bbox: None,
        }
    }

    fn extraction() -> DocumentExtraction {
        DocumentExtraction {
            doc_id: Some("ds01".to_string()),
            filename: Some("ds01.pdf".to_string()),
            pages: vec![PageExtraction {
                units: vec![unit_extract("u1", Some("3.3")), unit_extract("u2", None)],
                ..PageExtraction::default()
            }],
        }
    }

    #[test]
    fn test_ingest_extraction_stores_and_reports_rejections() {
        let store = MemoryFactStore::new();
        let metrics = MetricsRegistry::new();

        let report = ingest_extraction(&store, &metrics, &extraction(), None).unwrap();
        assert_eq!(report.document.doc_id, "ds01");
        assert_eq!(report.document.units, 1);
        assert_eq!(report.document.page_count, 1);
        assert_eq!(report.document.filename.as_deref(), Some("ds01.pdf"));
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id, "u2");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_stored, 1);
        assert_eq!(snapshot.facts_stored, 1);
        assert_eq!(snapshot.facts_rejected, 1);

        assert_eq!(store.get_facts("ds01").unwrap().units[0].doc_id, "ds01");
    }

    #[test]
    fn test_ingest_doc_id_precedence() {
        let store = MemoryFactStore::new();
        let metrics = MetricsRegistry::new();

        let report = ingest_extraction(&store, &metrics, &extraction(), Some("override".into())).unwrap();
        assert_eq!(report.document.doc_id, "override");

        let mut anonymous = extraction();
        anonymous.doc_id = None;
        let report = ingest_extraction(&store, &metrics, &anonymous, None).unwrap();
        assert!(validate_doc_id(&report.document.doc_id).is_ok());
        assert_eq!(store.list_documents().unwrap().len(), 2);
    }

    #[test]
    fn test_ingest_rejects_bad_doc_id() {
        let store = MemoryFactStore::new();
        let metrics = MetricsRegistry::new();
        let err = ingest_extraction(&store, &metrics, &extraction(), Some("../etc".into())).unwrap_err();
        assert_eq!(err.code_str(), "AKILI_CLI_STORE_ERROR");
        assert!(store.list_documents().unwrap().is_empty());
    }

    #[test]
    fn test_question_from_value() {
        let req = question_from_value(&json!({"doc_id": "ds01", "question": "what is pin 5"})).unwrap();
        assert_eq!(req.doc_id, "ds01");
        assert!(question_from_value(&json!({"doc_id": "ds01"})).is_err());
    }

    #[test]
    fn test_one_registry_counts_the_whole_command() {
        let temp = TempDir::new().unwrap();
        let config = Config::from_json(&format!(
            r#"{{"data_dir":{}}}"#,
            serde_json::to_string(&temp.path().display().to_string()).unwrap()
        ))
        .unwrap();
        let store = FileFactStore::open(config.data_path()).unwrap();
        let metrics = MetricsRegistry::new();
        ingest_extraction(&store, &metrics, &extraction(), None).unwrap();

        let ask = |question: &str| {
            respond(
                &config,
                &store,
                &metrics,
                Request::Query(QuestionRequest {
                    doc_id: "ds01".into(),
                    question: question.into(),
                }),
            )
        };
        assert_eq!(ask("what is VCC").data().unwrap()["text"], "3.3");
        assert_eq!(ask("what is pin 9").data().unwrap()["status"], "refuse");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_stored, 1);
        assert_eq!(snapshot.facts_rejected, 1);
        assert_eq!(snapshot.questions, 2);
        assert_eq!(snapshot.answers, 1);
        assert_eq!(snapshot.refusals(), 1);

        let counters: Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(counters["questions"], 2);
        metrics.report("query");
    }

    #[test]
    fn test_run_command_init_then_documents() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("akili.json");
        let data_dir = temp.path().join("data");
        fs::write(
            &config_path,
            json!({ "data_dir": data_dir.display().to_string() }).to_string(),
        )
        .unwrap();

        run_command(Command::Init {
            config: config_path.clone(),
        })
        .unwrap();
        assert!(is_initialized(&data_dir));

        let err = run_command(Command::Init {
            config: config_path.clone(),
        })
        .unwrap_err();
        assert_eq!(err.code_str(), "AKILI_CLI_ALREADY_INITIALIZED");

        run_command(Command::Documents { config: config_path }).unwrap();
    }

    #[test]
    fn test_is_initialized() {
        let temp = TempDir::new().unwrap();
        assert!(!is_initialized(temp.path()));
        FileFactStore::open(temp.path()).unwrap();
        assert!(is_initialized(temp.path()));
    }
}
