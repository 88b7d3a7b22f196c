//! Logging to the browser console.
//!
//! Events recorded with the `tracing` macros are formatted as
//! `LEVEL target: message key=value` and written with the `console` method
//! matching their level. Off wasm they go to stderr.

use std::fmt::{self, Write as _};

use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    filter::LevelFilter,
    layer::{Context, SubscriberExt},
    util::SubscriberInitExt,
    Layer,
};

type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

/// A [`Layer`] writing every event as one console line.
pub struct ConsoleLayer {
    sink: Sink,
}

impl fmt::Debug for ConsoleLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLayer").finish_non_exhaustive()
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLayer {
    /// Constructs a layer writing to the console.
    pub fn new() -> Self {
        Self::with_sink(write_console)
    }

    /// Constructs a layer handing the formatted lines to `sink`.
    pub fn with_sink<F>(sink: F) -> Self
    where
        F: Fn(Level, &str) + Send + Sync + 'static,
    {
        Self {
            sink: Box::new(sink),
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let line = format!(
            "{} {}: {}",
            metadata.level(),
            metadata.target(),
            visitor.finish()
        );
        (self.sink)(*metadata.level(), &line);
    }
}

/// Collects the message and the other fields of an event.
#[derive(Debug, Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let line = web_sys::wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::info_1(&line),
        _ => web_sys::console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, line: &str) {
    eprintln!("{line}");
}

/// Installs the global subscriber, logging events up to `level`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(level: LevelFilter) -> bool {
    tracing_subscriber::registry()
        .with(level)
        .with(ConsoleLayer::new())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use pretty_assertions::assert_eq;

    fn capture(level: LevelFilter, emit: impl FnOnce()) -> Vec<(Level, String)> {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let layer = ConsoleLayer::with_sink({
            let lines = Arc::clone(&lines);
            move |level, line: &str| lines.lock().unwrap().push((level, line.to_string()))
        });
        let subscriber = tracing_subscriber::registry().with(level).with(layer);
        tracing::subscriber::with_default(subscriber, emit);
        let lines = lines.lock().unwrap().clone();
        lines
    }

    #[test]
    fn formats_message_and_fields() {
        let lines = capture(LevelFilter::DEBUG, || {
            tracing::warn!(key = "speed", value = 3, "ignoring query parameter");
        });
        assert_eq!(
            lines,
            vec![(
                Level::WARN,
                "WARN colorsine::logging::tests: ignoring query parameter key=speed value=3"
                    .to_string()
            )]
        );
    }

    #[test]
    fn respects_the_level() {
        let lines = capture(LevelFilter::INFO, || {
            tracing::debug!("hidden");
            tracing::error!(frames = 2_u64);
        });
        assert_eq!(
            lines,
            vec![(
                Level::ERROR,
                "ERROR colorsine::logging::tests: frames=2".to_string()
            )]
        );
    }
}
