// Metrics hooks for the detection engine.
//
// Callers install a global `DetectMetrics` implementation via
// [`set_detect_metrics`], after which `Detector` reports per-pair latency and
// fragment counts for each detection. This keeps instrumentation decoupled
// from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for detection operations.
pub trait DetectMetrics: Send + Sync {
    /// Record the outcome of one pair detection.
    ///
    /// `file1`/`file2` are the compared file names, `latency` is the
    /// wall-clock duration of the comparison, and `mapped_fragments` is the
    /// number of fragments lifted for the report.
    fn record_detection(&self, file1: &str, file2: &str, latency: Duration, mapped_fragments: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn DetectMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn DetectMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn DetectMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global detection metrics recorder.
///
/// Typically called once during service startup so all `Detector` instances
/// share the same metrics backend.
pub fn set_detect_metrics(recorder: Option<Arc<dyn DetectMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("detect metrics lock poisoned");
    *guard = recorder;
}
