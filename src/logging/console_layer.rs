//! Tracing layer that mirrors the application's own warnings and errors into
//! the console.

use crate::console::LogSender;
use crate::model::Category;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Forwards `WARN` and `ERROR` events to a console through a [`LogSender`].
///
/// The event message becomes the entry message; other fields become the
/// entry context, one `name=value` per line. A dropped console is ignored.
#[derive(Debug, Clone)]
pub struct ConsoleLayer {
    sender: LogSender,
}

impl ConsoleLayer {
    /// Layer sending into `sender`.
    pub fn new(sender: LogSender) -> Self {
        Self { sender }
    }
}

fn category_for(level: &Level) -> Option<Category> {
    match *level {
        Level::ERROR => Some(Category::Error),
        Level::WARN => Some(Category::Warning),
        _ => None,
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: String,
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field, format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field, format_args!("{:?}", value));
        }
    }
}

impl EntryVisitor {
    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push('\n');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(category) = category_for(event.metadata().level()) else {
            return;
        };
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        self.sender.send(visitor.message, visitor.fields, category);
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
