//! Status bar: counters, filter toggles, search and follow state.

use super::styles::ConsoleStyles;
use crate::console::ListDataSource;
use crate::model::{Bucket, FilterClass};
use ratatui::text::{Line, Span};

/// Everything the status bar shows besides the console itself.
#[derive(Debug, Clone, Copy)]
pub struct StatusContext<'a> {
    /// Input label (`stdin`, a file path, `interactive`).
    pub source: &'a str,
    /// Whether the list follows new output.
    pub following: bool,
    /// Whether a live input is still attached.
    pub live: bool,
}

fn bucket_for(class: FilterClass) -> Bucket {
    match class {
        FilterClass::Logs => Bucket::Debug,
        FilterClass::Warnings => Bucket::Warning,
        FilterClass::Errors => Bucket::Error,
        FilterClass::Commands => Bucket::Command,
    }
}

/// Build the status line.
///
/// `[1] logs 12  [2] warnings 3 ...` toggles (hidden classes crossed out),
/// then the search string, then background-filter and follow indicators.
pub fn status_line(
    console: &ListDataSource,
    context: StatusContext<'_>,
    styles: ConsoleStyles,
) -> Line<'static> {
    let base = styles.status_bar();
    let settings = console.settings();
    let counter = console.counter();

    let mut spans = vec![Span::styled(format!(" {} ", context.source), base)];
    for (i, class) in FilterClass::ALL.into_iter().enumerate() {
        spans.push(Span::styled(" ", base));
        spans.push(Span::styled(
            format!(
                "[{}] {} {}",
                i + 1,
                class.name(),
                counter.get(bucket_for(class))
            ),
            styles.toggle(class, settings.shows(class)),
        ));
    }

    if !settings.search.is_empty() {
        let case = if settings.case_insensitive { "aA" } else { "Aa" };
        spans.push(Span::styled(
            format!("  /{}/ {}", settings.search, case),
            base,
        ));
    }

    spans.push(Span::styled(
        format!("  {}/{} rows", console.item_count(), console.store_len()),
        base,
    ));
    if console.is_filtering() {
        spans.push(Span::styled("  filtering…", base));
    }
    if console.selection_mode() {
        spans.push(Span::styled("  SELECT", base));
    }
    if context.live {
        spans.push(Span::styled("  LIVE", base));
    }
    if context.following {
        spans.push(Span::styled("  FOLLOW", base));
    }

    Line::from(spans).style(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ConsoleOptions, RecordingSurface};
    use crate::filter::{FilterDelta, FilterMode};
    use crate::model::Category;
    use crate::view::styles::ColorConfig;
    use ratatui::style::Modifier;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn console() -> (ListDataSource, RecordingSurface) {
        let console = ListDataSource::new(ConsoleOptions {
            filter_mode: FilterMode::Inline,
            welcome_banner: None,
            ..ConsoleOptions::default()
        });
        (console, RecordingSurface::new())
    }

    const CONTEXT: StatusContext<'static> = StatusContext {
        source: "stdin",
        following: true,
        live: false,
    };

    #[test]
    fn shows_counts_per_class() {
        let (mut console, mut surface) = console();
        console.append("e1", "", Category::Error);
        console.append("e2", "", Category::Error);
        console.append("w", "", Category::Warning);
        console.tick(&mut surface).expect("tick");

        let text = text_of(&status_line(
            &console,
            CONTEXT,
            ConsoleStyles::with_color_config(ColorConfig::new(true)),
        ));

        assert!(text.starts_with(" stdin "), "got: {}", text);
        assert!(text.contains("[2] warnings 1"), "got: {}", text);
        assert!(text.contains("[3] errors 2"), "got: {}", text);
        assert!(text.contains("3/3 rows"), "got: {}", text);
        assert!(text.contains("FOLLOW"));
        assert!(!text.contains("LIVE"));
    }

    #[test]
    fn hidden_class_and_search_are_visible() {
        let (mut console, mut surface) = console();
        console
            .set_filter(FilterDelta::class(FilterClass::Logs, false), &mut surface)
            .expect("filter");
        console
            .set_filter(FilterDelta::search("disk"), &mut surface)
            .expect("filter");

        let line = status_line(
            &console,
            CONTEXT,
            ConsoleStyles::with_color_config(ColorConfig::new(true)),
        );

        let logs = line
            .spans
            .iter()
            .find(|span| span.content.contains("logs"))
            .expect("logs toggle");
        assert!(logs.style.add_modifier.contains(Modifier::CROSSED_OUT));
        assert!(text_of(&line).contains("/disk/ Aa"));
    }
}
