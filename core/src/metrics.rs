//! Metrics sink consumed by the instrumenting middleware, plus an
//! in-process registry that renders the Prometheus text format.
//!
//! Counters are monotonic and reset only on process start. Histograms are
//! kept as summaries (observation count and sum).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Mutex;

/// A set of `(name, value)` labels attached to one observation.
pub type Labels<'a> = &'a [(&'a str, &'a str)];

/// Destination for named counters and histograms.
pub trait MetricsSink: Send + Sync {
    fn increment_counter(&self, name: &str, labels: Labels<'_>);

    fn observe_histogram(&self, name: &str, labels: Labels<'_>, value: f64);
}

/// Prefix applied to every metric name on render.
pub const NAMESPACE: &str = "todo_service";

type Key = (String, Vec<(String, String)>);

fn key(name: &str, labels: Labels<'_>) -> Key {
    let mut labels: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    labels.sort();
    (name.to_string(), labels)
}

/// Observation count and running sum for one histogram series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub count: u64,
    pub sum: f64,
}

#[derive(Debug, Default)]
struct Series {
    counters: BTreeMap<Key, u64>,
    summaries: BTreeMap<Key, Summary>,
}

/// Thread-safe in-memory metrics store.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    series: Mutex<Series>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter series; zero if never incremented.
    pub fn counter(&self, name: &str, labels: Labels<'_>) -> u64 {
        let Ok(series) = self.series.lock() else {
            return 0;
        };
        series.counters.get(&key(name, labels)).copied().unwrap_or(0)
    }

    /// Current summary of a histogram series; empty if never observed.
    pub fn summary(&self, name: &str, labels: Labels<'_>) -> Summary {
        let Ok(series) = self.series.lock() else {
            return Summary::default();
        };
        series.summaries.get(&key(name, labels)).copied().unwrap_or_default()
    }

    /// Render all series in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let Ok(series) = self.series.lock() else {
            return out;
        };

        let mut last_name = None;
        for ((name, labels), value) in &series.counters {
            if last_name != Some(name) {
                let _ = writeln!(out, "# TYPE {NAMESPACE}_{name} counter");
                last_name = Some(name);
            }
            let _ = writeln!(out, "{NAMESPACE}_{name}{} {value}", format_labels(labels));
        }

        let mut last_name = None;
        for ((name, labels), summary) in &series.summaries {
            if last_name != Some(name) {
                let _ = writeln!(out, "# TYPE {NAMESPACE}_{name} summary");
                last_name = Some(name);
            }
            let labels = format_labels(labels);
            let _ = writeln!(out, "{NAMESPACE}_{name}_sum{labels} {}", summary.sum);
            let _ = writeln!(out, "{NAMESPACE}_{name}_count{labels} {}", summary.count);
        }
        out
    }
}

fn format_labels(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("{{{}}}", pairs.join(","))
}

impl MetricsSink for MetricsRegistry {
    fn increment_counter(&self, name: &str, labels: Labels<'_>) {
        if let Ok(mut series) = self.series.lock() {
            *series.counters.entry(key(name, labels)).or_insert(0) += 1;
        }
    }

    fn observe_histogram(&self, name: &str, labels: Labels<'_>, value: f64) {
        if let Ok(mut series) = self.series.lock() {
            let summary = series.summaries.entry(key(name, labels)).or_default();
            summary.count += 1;
            summary.sum += value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_accumulate() {
        let registry = MetricsRegistry::new();
        let labels = [("method", "CreateTodo"), ("error", "false")];
        assert_eq!(registry.counter("request_count", &labels), 0);

        registry.increment_counter("request_count", &labels);
        registry.increment_counter("request_count", &labels);
        assert_eq!(registry.counter("request_count", &labels), 2);
    }

    #[test]
    fn label_order_does_not_split_series() {
        let registry = MetricsRegistry::new();
        registry.increment_counter("c", &[("a", "1"), ("b", "2")]);
        registry.increment_counter("c", &[("b", "2"), ("a", "1")]);
        assert_eq!(registry.counter("c", &[("a", "1"), ("b", "2")]), 2);
    }

    #[test]
    fn distinct_label_values_are_distinct_series() {
        let registry = MetricsRegistry::new();
        registry.increment_counter("c", &[("error", "true")]);
        assert_eq!(registry.counter("c", &[("error", "false")]), 0);
        assert_eq!(registry.counter("c", &[("error", "true")]), 1);
    }

    #[test]
    fn histogram_tracks_count_and_sum() {
        let registry = MetricsRegistry::new();
        registry.observe_histogram("d", &[], 0.5);
        registry.observe_histogram("d", &[], 0.25);
        assert_eq!(registry.summary("d", &[]), Summary { count: 2, sum: 0.75 });
    }

    #[test]
    fn render_uses_prometheus_text_format() {
        let registry = MetricsRegistry::new();
        registry.increment_counter("request_count", &[("method", "GetAllTodos"), ("error", "false")]);
        registry.observe_histogram("request_duration_seconds", &[("method", "GetAllTodos")], 1.5);

        let text = registry.render();
        assert!(text.contains("# TYPE todo_service_request_count counter"));
        assert!(text.contains(r#"todo_service_request_count{error="false",method="GetAllTodos"} 1"#));
        assert!(text.contains("# TYPE todo_service_request_duration_seconds summary"));
        assert!(text.contains(r#"todo_service_request_duration_seconds_sum{method="GetAllTodos"} 1.5"#));
        assert!(text.contains(r#"todo_service_request_duration_seconds_count{method="GetAllTodos"} 1"#));
    }

    #[test]
    fn render_escapes_label_values() {
        let registry = MetricsRegistry::new();
        registry.increment_counter("c", &[("v", "a\"b")]);
        assert!(registry.render().contains(r#"todo_service_c{v="a\"b"} 1"#));
    }
}
