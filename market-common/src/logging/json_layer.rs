//! JSON lines layer for log shipping.

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use chrono::{Local, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One serialized log line.
#[derive(Debug, Clone, Serialize)]
pub struct JsonLogEvent {
    pub timestamp: String,
    pub level: String,
    /// 0 = TRACE .. 4 = ERROR
    pub level_num: u8,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Structured fields other than the message
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
    /// Process-wide ordering
    pub seq: u64,
}

impl JsonLogEvent {
    pub fn new(level: Level, target: &str, message: String, timestamp: String) -> Self {
        Self {
            timestamp,
            level: level.to_string(),
            level_num: level_to_num(level),
            target: target.to_string(),
            message,
            file: None,
            line: None,
            thread_id: None,
            app: None,
            fields: Map::new(),
            seq: SEQUENCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn with_location(mut self, file: Option<&str>, line: Option<u32>) -> Self {
        self.file = file.map(str::to_string);
        self.line = line;
        self
    }

    pub fn with_thread_id(mut self) -> Self {
        self.thread_id = Some(format!("{:?}", thread::current().id()));
        self
    }

    pub fn with_app(mut self, app: Option<&str>) -> Self {
        self.app = app.map(str::to_string);
        self
    }
}

fn level_to_num(level: Level) -> u8 {
    match level {
        Level::TRACE => 0,
        Level::DEBUG => 1,
        Level::INFO => 2,
        Level::WARN => 3,
        Level::ERROR => 4,
    }
}

pub(crate) struct JsonLayer {
    app_name: Option<String>,
    include_location: bool,
    include_thread_ids: bool,
    use_utc: bool,
}

impl JsonLayer {
    pub(crate) fn new(
        app_name: Option<String>,
        include_location: bool,
        include_thread_ids: bool,
        use_utc: bool,
    ) -> Self {
        Self {
            app_name,
            include_location,
            include_thread_ids,
            use_utc,
        }
    }

    fn timestamp(&self) -> String {
        if self.use_utc {
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        } else {
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
        }
    }
}

impl<S> Layer<S> for JsonLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let mut log_event = JsonLogEvent::new(
            *metadata.level(),
            metadata.target(),
            visitor.message.unwrap_or_default(),
            self.timestamp(),
        )
        .with_app(self.app_name.as_deref());

        if self.include_location {
            log_event = log_event.with_location(metadata.file(), metadata.line());
        }
        if self.include_thread_ids {
            log_event = log_event.with_thread_id();
        }
        log_event.fields = visitor.fields;

        if let Ok(json) = serde_json::to_string(&log_event) {
            let _ = writeln!(io::stderr().lock(), "{}", json);
        }
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let text = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.insert(field, Value::String(text));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    // Raw token amounts exceed the JSON number range; keep them exact as text.
    fn record_u128(&mut self, field: &Field, value: u128) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_i128(&mut self, field: &Field, value: i128) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, Value::Number(n));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }
}
