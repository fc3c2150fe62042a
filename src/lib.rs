//! Workspace umbrella crate for pasim, the Pascal source similarity engine.
//!
//! The `pasim` crate re-exports the ingest, lexer, fingerprint, index, and
//! matcher layers so applications can drive the full detection pipeline
//! through a single dependency. Helpers such as [`detect_texts`],
//! [`detect_paths`], and [`detect_batch_paths`] orchestrate the stages
//! end-to-end, while [`detect_sources`] and [`detect_batch_sources`] start
//! from already-loaded files.
//!
//! ## Quick start
//!
//! ```
//! use pasim::{detect_texts, DetectorConfig, IngestConfig};
//!
//! let result = detect_texts(
//!     "a.pas",
//!     "program A; begin writeln('hi'); end.",
//!     "b.pas",
//!     "program B; begin writeln('hi'); end.",
//!     &IngestConfig::default(),
//!     &DetectorConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.overall_similarity, 1.0);
//! assert!(result.is_plagiarism);
//! ```
//!
//! ## Observability
//!
//! Metrics and structured logs can be captured by installing a
//! [`PipelineMetrics`] recorder via [`set_pipeline_metrics`] and/or a
//! [`PipelineEventLogger`] with [`set_pipeline_logger`]. Both hooks receive
//! the compared file names and the concrete stage outcome so deployments can
//! correlate engine work with upstream request handling. `PipelineMetrics`
//! is best suited for latency/histogram telemetry, whereas
//! `PipelineEventLogger` provides structured events for centralized logging;
//! [`KeyValueLogger`] is a ready-made logger writing `key="value"` lines to
//! any writer.
//!
//! In typical services these hooks are registered once during startup
//! alongside construction of the stage configs, ensuring every call to the
//! pipeline helpers shares a consistent view of instrumentation.
//!
//! ## Errors
//!
//! Failures produced by any layer converge on [`PipelineError`], which maps
//! the source error so callers can distinguish ingest, lex, fingerprint,
//! index, or match failures without depending on the individual workspace
//! crates. Note that the engine itself degrades malformed or empty files to
//! zero-similarity results per its error policy; `PipelineError` carries the
//! failures that cannot degrade (I/O, invalid configuration, cancellation).

pub use fingerprint::{
    fingerprint_tokens, kgram_hashes, winnow, FileFingerprint, FingerprintConfig,
    FingerprintError, FingerprintMeta, SelectedFingerprint, FINGERPRINT_ALGORITHM,
    FINGERPRINT_VERSION,
};
pub use index::{
    FileId, FingerprintIndex, IndexError, Occurrence, PairAnalysis, SharedKGram,
};
pub use ingest::{ingest_path, ingest_text, IngestConfig, IngestError, SourceFile};
pub use lexer::{
    lex, LexConfig, LexError, Region, Token, TokenKind, TokenizedFile,
};
pub use matcher::{
    adaptive_threshold, batch_threshold, set_detect_metrics, BatchResult, ConfidenceLevel,
    DetectMetrics, Detector, DetectorConfig, Fragment, FragmentClass, LineRange, MappedFragment,
    MatchError, PlagiarismResult, TokenRange,
};

pub mod config;

use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};

/// Errors that can occur while driving the detection pipeline.
#[derive(Debug, Clone)]
pub enum PipelineError {
    Ingest(IngestError),
    Lex(LexError),
    Fingerprint(FingerprintError),
    Index(IndexError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Lex(err) => write!(f, "lex failure: {err}"),
            PipelineError::Fingerprint(err) => write!(f, "fingerprint failure: {err}"),
            PipelineError::Index(err) => write!(f, "index failure: {err}"),
            PipelineError::Match(err) => write!(f, "match failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Lex(err) => Some(err),
            PipelineError::Fingerprint(err) => Some(err),
            PipelineError::Index(err) => Some(err),
            PipelineError::Match(err) => Some(err),
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<LexError> for PipelineError {
    fn from(value: LexError) -> Self {
        PipelineError::Lex(value)
    }
}

impl From<FingerprintError> for PipelineError {
    fn from(value: FingerprintError) -> Self {
        PipelineError::Fingerprint(value)
    }
}

impl From<IndexError> for PipelineError {
    fn from(value: IndexError) -> Self {
        PipelineError::Index(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_ingest(&self, latency: Duration, result: Result<(), IngestError>);
    fn record_lex(&self, latency: Duration, result: Result<(), LexError>);
    fn record_fingerprint(&self, latency: Duration, result: Result<(), FingerprintError>);
    fn record_index(&self, latency: Duration, result: Result<(), IndexError>);
    fn record_match(&self, latency: Duration, result: Result<(), MatchError>);
}

/// Processing stage captured in observability events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Ingest,
    Lex,
    Fingerprint,
    Index,
    Match,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Ingest => "ingest",
            PipelineStage::Lex => "lex",
            PipelineStage::Fingerprint => "fingerprint",
            PipelineStage::Index => "index",
            PipelineStage::Match => "match",
        };
        f.write_str(name)
    }
}

/// Outcome of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEventStatus {
    Success,
    Failure,
}

impl fmt::Display for PipelineEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineEventStatus::Success => "success",
            PipelineEventStatus::Failure => "failure",
        };
        f.write_str(label)
    }
}

/// Structured observation describing the outcome of a pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineEvent {
    pub stage: PipelineStage,
    pub status: PipelineEventStatus,
    pub latency: Duration,
    pub file1: String,
    pub file2: Option<String>,
    pub error: Option<String>,
}

impl PipelineEvent {
    fn from_outcome(
        stage: PipelineStage,
        context: &StageContext,
        latency: Duration,
        error: Option<String>,
    ) -> Self {
        let status = if error.is_some() {
            PipelineEventStatus::Failure
        } else {
            PipelineEventStatus::Success
        };
        Self {
            stage,
            status,
            latency,
            file1: context.file1.clone(),
            file2: context.file2.clone(),
            error,
        }
    }

    fn format_key_values(&self, include_timestamp: bool) -> String {
        let mut parts = Vec::new();
        if include_timestamp {
            let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            parts.push(format!("timestamp=\"{ts}\""));
        }
        let stage = self.stage;
        parts.push(format!("stage={stage}"));
        let status = self.status;
        parts.push(format!("status={status}"));
        let latency_us = self.latency.as_micros();
        parts.push(format!("latency_us={latency_us}"));
        let file1 = escape_kv(&self.file1);
        parts.push(format!("file1=\"{file1}\""));
        if let Some(file2) = &self.file2 {
            let file2 = escape_kv(file2);
            parts.push(format!("file2=\"{file2}\""));
        }
        if let Some(error) = &self.error {
            let error = escape_kv(error);
            parts.push(format!("error=\"{error}\""));
        }
        parts.join(" ")
    }
}

fn escape_kv(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Hook for emitting structured events per pipeline stage.
pub trait PipelineEventLogger: Send + Sync {
    fn log(&self, event: &PipelineEvent);
}

/// Simple key-value logger that writes structured events to any writer.
pub struct KeyValueLogger {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    include_timestamp: bool,
}

impl KeyValueLogger {
    /// Create a logger that writes to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Create a logger backed by the provided writer.
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            include_timestamp: true,
        }
    }

    /// Toggle timestamp emission for the structured log line.
    pub fn with_timestamps(mut self, include_timestamp: bool) -> Self {
        self.include_timestamp = include_timestamp;
        self
    }
}

impl PipelineEventLogger for KeyValueLogger {
    fn log(&self, event: &PipelineEvent) {
        if let Ok(mut writer) = self.writer.lock() {
            let line = event.format_key_values(self.include_timestamp);
            let _ = writeln!(writer, "{line}");
        }
    }
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("pipeline metrics lock poisoned");
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the structured pipeline event logger.
pub fn set_pipeline_logger(logger: Option<Arc<dyn PipelineEventLogger>>) {
    let lock = logger_lock();
    let mut guard = lock.write().expect("pipeline logger lock poisoned");
    *guard = logger;
}

fn logger_lock() -> &'static RwLock<Option<Arc<dyn PipelineEventLogger>>> {
    static LOGGER: OnceLock<RwLock<Option<Arc<dyn PipelineEventLogger>>>> = OnceLock::new();
    LOGGER.get_or_init(|| RwLock::new(None))
}

fn pipeline_logger() -> Option<Arc<dyn PipelineEventLogger>> {
    let guard = logger_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

#[derive(Debug, Clone)]
struct StageContext {
    file1: String,
    file2: Option<String>,
}

impl StageContext {
    fn single(file: &str) -> Self {
        Self {
            file1: file.to_string(),
            file2: None,
        }
    }

    fn pair(file1: &str, file2: &str) -> Self {
        Self {
            file1: file1.to_string(),
            file2: Some(file2.to_string()),
        }
    }
}

struct MetricsSpan {
    recorder: Option<Arc<dyn PipelineMetrics>>,
    logger: Option<Arc<dyn PipelineEventLogger>>,
    stage: PipelineStage,
    context: StageContext,
    start: Instant,
}

impl MetricsSpan {
    fn start(stage: PipelineStage, context: StageContext) -> Option<Self> {
        let recorder = metrics_recorder();
        let logger = pipeline_logger();
        if recorder.is_none() && logger.is_none() {
            return None;
        }
        Some(Self {
            recorder,
            logger,
            stage,
            context,
            start: Instant::now(),
        })
    }

    fn record_ingest(self, result: Result<(), IngestError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_ingest(latency, result);
        }
    }

    fn record_lex(self, result: Result<(), LexError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_lex(latency, result);
        }
    }

    fn record_fingerprint(self, result: Result<(), FingerprintError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_fingerprint(latency, result);
        }
    }

    fn record_index(self, result: Result<(), IndexError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_index(latency, result);
        }
    }

    fn record_match(self, result: Result<(), MatchError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_match(latency, result);
        }
    }

    fn emit_event(&self, latency: Duration, error: Option<String>) {
        if let Some(logger) = self.logger.as_ref() {
            let event = PipelineEvent::from_outcome(self.stage, &self.context, latency, error);
            logger.log(&event);
        }
    }
}

/// Ingest one text with metrics tracking.
fn ingest_with_metrics(
    name: &str,
    text: &str,
    cfg: &IngestConfig,
) -> Result<SourceFile, PipelineError> {
    let span = MetricsSpan::start(PipelineStage::Ingest, StageContext::single(name));
    let result = ingest_text(name, text, cfg);
    if let Some(span) = span {
        span.record_ingest(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    Ok(result?)
}

/// Lex one source file with metrics tracking.
///
/// Wraps [`lex`] and records latency to the metrics pipeline.
pub fn lex_with_metrics(
    name: &str,
    text: &str,
    cfg: &LexConfig,
) -> Result<TokenizedFile, LexError> {
    let span = MetricsSpan::start(PipelineStage::Lex, StageContext::single(name));
    let result = lex(name, text, cfg);
    if let Some(span) = span {
        span.record_lex(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    result
}

/// Fingerprint a tokenized file with metrics tracking.
///
/// Wraps [`fingerprint_tokens`] and records latency to the metrics pipeline.
pub fn fingerprint_with_metrics(
    tokens: &TokenizedFile,
    cfg: &FingerprintConfig,
) -> Result<FileFingerprint, FingerprintError> {
    let span = MetricsSpan::start(PipelineStage::Fingerprint, StageContext::single(&tokens.name));
    let texts: Vec<&str> = tokens.texts().collect();
    let result = fingerprint_tokens(&texts, cfg);
    if let Some(span) = span {
        span.record_fingerprint(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    result
}

/// Register a fingerprint in an index with metrics tracking.
///
/// Wraps [`FingerprintIndex::add_file`] and records latency to the metrics
/// pipeline, keyed by the file's position in the index.
pub fn index_add_with_metrics(index: &mut FingerprintIndex, fp: &FileFingerprint) -> FileId {
    let label = format!("file-{}", index.file_count());
    let span = MetricsSpan::start(PipelineStage::Index, StageContext::single(&label));
    let id = index.add_file(fp);
    if let Some(span) = span {
        span.record_index(Ok(()));
    }
    id
}

/// Compare two loaded source files end-to-end.
pub fn detect_sources(
    left: &SourceFile,
    right: &SourceFile,
    cfg: &DetectorConfig,
) -> Result<PlagiarismResult, PipelineError> {
    let detector = Detector::new(cfg.clone())?;
    let span = MetricsSpan::start(
        PipelineStage::Match,
        StageContext::pair(&left.name, &right.name),
    );
    let result = detector.detect(left, right);
    if let Some(span) = span {
        span.record_match(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    Ok(result?)
}

/// Compare two in-memory texts end-to-end.
pub fn detect_texts(
    name_left: &str,
    text_left: &str,
    name_right: &str,
    text_right: &str,
    ingest_cfg: &IngestConfig,
    detector_cfg: &DetectorConfig,
) -> Result<PlagiarismResult, PipelineError> {
    let left = ingest_with_metrics(name_left, text_left, ingest_cfg)?;
    let right = ingest_with_metrics(name_right, text_right, ingest_cfg)?;
    detect_sources(&left, &right, detector_cfg)
}

/// Compare two files on disk end-to-end.
pub fn detect_paths(
    left: &Path,
    right: &Path,
    ingest_cfg: &IngestConfig,
    detector_cfg: &DetectorConfig,
) -> Result<PlagiarismResult, PipelineError> {
    let left = ingest_path(left, ingest_cfg)?;
    let right = ingest_path(right, ingest_cfg)?;
    detect_sources(&left, &right, detector_cfg)
}

/// Batch-compare loaded source files.
pub fn detect_batch_sources(
    files: &[SourceFile],
    cfg: &DetectorConfig,
) -> Result<BatchResult, PipelineError> {
    let detector = Detector::new(cfg.clone())?;
    let label = format!("batch-{}", files.len());
    let span = MetricsSpan::start(PipelineStage::Match, StageContext::single(&label));
    let result = detector.detect_batch(files);
    if let Some(span) = span {
        span.record_match(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    Ok(result?)
}

/// Batch-compare files on disk.
pub fn detect_batch_paths(
    paths: &[&Path],
    ingest_cfg: &IngestConfig,
    detector_cfg: &DetectorConfig,
) -> Result<BatchResult, PipelineError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(ingest_path(path, ingest_cfg)?);
    }
    detect_batch_sources(&files, detector_cfg)
}
