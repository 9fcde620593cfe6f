//! Log line template rendering
//!
//! Compiles a `%(asctime)s`-style template into segments once at bootstrap
//! and renders each event against them. Timestamps use local time.

use std::fmt;

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Timestamp,
    Level,
    Name,
    Message,
}

/// Compiled log line template.
#[derive(Debug, Clone)]
pub struct LineFormat {
    segments: Vec<Segment>,
}

impl LineFormat {
    /// Compile a template string.
    ///
    /// Recognized placeholders are `%(asctime)s`, `%(levelname)s`,
    /// `%(name)s`, and `%(message)s`; anything else, including unknown
    /// `%(...)s` placeholders, passes through as literal text.
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(start) = rest.find("%(") {
            let (head, tail) = rest.split_at(start);
            literal.push_str(head);

            let Some(end) = tail.find(")s") else {
                // Unterminated placeholder, keep the remainder verbatim
                literal.push_str(tail);
                rest = "";
                break;
            };

            let segment = match &tail[2..end] {
                "asctime" => Some(Segment::Timestamp),
                "levelname" => Some(Segment::Level),
                "name" => Some(Segment::Name),
                "message" => Some(Segment::Message),
                _ => None,
            };

            if let Some(segment) = segment {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
            } else {
                literal.push_str(&tail[..end + 2]);
            }

            rest = &tail[end + 2..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    #[cfg(test)]
    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => writer.write_str(text)?,
                Segment::Timestamp => {
                    write!(writer, "{}", Local::now().format(TIMESTAMP_FORMAT))?;
                }
                Segment::Level => write!(writer, "{}", event.metadata().level())?,
                Segment::Name => match &visitor.name {
                    Some(name) => writer.write_str(name)?,
                    None => writer.write_str(event.metadata().target())?,
                },
                Segment::Message => writer.write_str(&visitor.message)?,
            }
        }

        writeln!(writer)
    }
}

/// Pulls the message and the `logger` name field out of an event.
#[derive(Default)]
struct LineVisitor {
    message: String,
    name: Option<String>,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "logger" => self.name = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "logger" => self.name = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_template() {
        let format = LineFormat::parse("[%(asctime)s] %(levelname)s %(name)s : %(message)s");
        assert_eq!(
            format.segments(),
            &[
                Segment::Literal("[".to_string()),
                Segment::Timestamp,
                Segment::Literal("] ".to_string()),
                Segment::Level,
                Segment::Literal(" ".to_string()),
                Segment::Name,
                Segment::Literal(" : ".to_string()),
                Segment::Message,
            ]
        );
    }

    #[test]
    fn test_parse_plain_literal() {
        let format = LineFormat::parse("no placeholders here");
        assert_eq!(
            format.segments(),
            &[Segment::Literal("no placeholders here".to_string())]
        );
    }

    #[test]
    fn test_unknown_placeholder_stays_literal() {
        let format = LineFormat::parse("%(thread)s %(message)s");
        assert_eq!(
            format.segments(),
            &[
                Segment::Literal("%(thread)s ".to_string()),
                Segment::Message,
            ]
        );
    }

    #[test]
    fn test_unterminated_placeholder_stays_literal() {
        let format = LineFormat::parse("%(message)s %(oops");
        assert_eq!(
            format.segments(),
            &[Segment::Message, Segment::Literal(" %(oops".to_string())]
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        let format = LineFormat::parse("%(levelname)s%(message)s");
        assert_eq!(format.segments(), &[Segment::Level, Segment::Message]);
    }
}
