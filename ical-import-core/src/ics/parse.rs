//! ICS feed parsing using the icalendar crate's parser.

use chrono::NaiveDate;
use icalendar::parser::{Component, Property, read_calendar, unfold};

use super::date::property_date;
use crate::error::{ImportError, ImportResult};

/// Summary for events without a SUMMARY property.
const UNTITLED: &str = "(No title)";

/// The parts of a VEVENT a booking is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub summary: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Parse calendar text and extract every VEVENT in document order.
///
/// Components are walked depth-first, so nested events are picked up too.
/// Any event without a usable DTSTART or DTEND fails the whole parse.
pub fn parse_events(content: &str) -> ImportResult<Vec<FeedEvent>> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    ensure_calendar(content)?;

    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| ImportError::IcsParse(parse_failure(&e.to_string())))?;

    let mut events = Vec::new();
    collect_events(&calendar.components, &mut events)?;
    Ok(events)
}

/// Reject bodies that are not calendar text at all, such as HTML error pages.
fn ensure_calendar(content: &str) -> ImportResult<()> {
    let first_line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty());

    match first_line {
        Some(line) if line.eq_ignore_ascii_case("BEGIN:VCALENDAR") => Ok(()),
        Some(_) => Err(ImportError::IcsParse(
            "content does not start with BEGIN:VCALENDAR".to_string(),
        )),
        None => Err(ImportError::IcsParse("calendar feed is empty".to_string())),
    }
}

fn collect_events(components: &[Component<'_>], events: &mut Vec<FeedEvent>) -> ImportResult<()> {
    for component in components {
        if is_named(component, "VEVENT") {
            events.push(read_event(component)?);
        }
        collect_events(&component.components, events)?;
    }
    Ok(())
}

fn is_named(component: &Component<'_>, name: &str) -> bool {
    let component_name: &str = component.name.as_ref();
    component_name.eq_ignore_ascii_case(name)
}

/// Property lookup ignoring case, since property names are case-insensitive.
fn find_property<'c, 'a>(component: &'c Component<'a>, name: &str) -> Option<&'c Property<'a>> {
    component.properties.iter().find(|p| {
        let property_name: &str = p.name.as_ref();
        property_name.eq_ignore_ascii_case(name)
    })
}

/// Reduce the parser's multi-line trace to a one-line message.
fn parse_failure(trace: &str) -> String {
    let line = trace.split("at line ").nth(1).and_then(|rest| {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<usize>().ok()
    });

    match line {
        Some(line) => format!("malformed calendar text at line {line}"),
        None => "malformed calendar text".to_string(),
    }
}

fn read_event(vevent: &Component<'_>) -> ImportResult<FeedEvent> {
    let summary = find_property(vevent, "SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| UNTITLED.to_string());

    let start = event_date(vevent, "DTSTART", &summary)?;
    let end = event_date(vevent, "DTEND", &summary)?;

    Ok(FeedEvent {
        summary,
        start,
        end,
    })
}

fn event_date(vevent: &Component<'_>, property: &'static str, summary: &str) -> ImportResult<NaiveDate> {
    let prop = find_property(vevent, property)
        .ok_or_else(|| ImportError::MissingDate {
            property,
            summary: summary.to_string(),
        })?;

    property_date(prop).ok_or_else(|| ImportError::InvalidDate {
        property,
        summary: summary.to_string(),
        value: prop.val.to_string(),
    })
}

/// Decode RFC 5545 TEXT escapes (`\n`, `\,`, `\;`, `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_single_all_day_event() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:booking-1
SUMMARY:Test Booking
DTSTART:20250101
DTEND:20250105
END:VEVENT
END:VCALENDAR"#;

        let events = parse_events(ics).expect("Should parse");

        assert_eq!(
            events,
            vec![FeedEvent {
                summary: "Test Booking".to_string(),
                start: date(2025, 1, 1),
                end: date(2025, 1, 5),
            }]
        );
    }

    #[test]
    fn test_parse_keeps_feed_order() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:c\r\n\
SUMMARY:Third in time\r\n\
DTSTART;VALUE=DATE:20250310\r\n\
DTEND;VALUE=DATE:20250312\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
SUMMARY:First in time\r\n\
DTSTART;VALUE=DATE:20250101\r\n\
DTEND;VALUE=DATE:20250102\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:b\r\n\
SUMMARY:Second in time\r\n\
DTSTART;VALUE=DATE:20250201\r\n\
DTEND;VALUE=DATE:20250203\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let events = parse_events(ics).expect("Should parse");
        let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();

        assert_eq!(summaries, vec!["Third in time", "First in time", "Second in time"]);
    }

    #[test]
    fn test_parse_calendar_without_events() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
END:VCALENDAR"#;

        let events = parse_events(ics).expect("Should parse");
        assert!(events.is_empty());
    }

    #[test]
    fn test_datetime_values_reduce_to_dates() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:utc
SUMMARY:Utc
DTSTART:20250101T233000Z
DTEND:20250102T010000Z
END:VEVENT
BEGIN:VEVENT
UID:floating
SUMMARY:Floating
DTSTART:20250201T100000
DTEND:20250201T110000
END:VEVENT
BEGIN:VEVENT
UID:zoned
SUMMARY:Zoned
DTSTART;TZID=Australia/Sydney:20250301T233000
DTEND;TZID=Australia/Sydney:20250302T090000
END:VEVENT
END:VCALENDAR"#;

        let events = parse_events(ics).expect("Should parse");
        let ranges: Vec<(NaiveDate, NaiveDate)> = events.iter().map(|e| (e.start, e.end)).collect();

        assert_eq!(
            ranges,
            vec![
                (date(2025, 1, 1), date(2025, 1, 2)),
                (date(2025, 2, 1), date(2025, 2, 1)),
                (date(2025, 3, 1), date(2025, 3, 2)),
            ]
        );
    }

    #[test]
    fn test_non_event_components_are_skipped() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VTIMEZONE
TZID:Australia/Sydney
BEGIN:STANDARD
DTSTART:20250406T030000
TZOFFSETFROM:+1100
TZOFFSETTO:+1000
END:STANDARD
END:VTIMEZONE
BEGIN:VTODO
UID:todo-1
SUMMARY:Clean room
DTSTART:20250101
END:VTODO
BEGIN:VEVENT
UID:event-1
SUMMARY:Blocked night
DTSTART;VALUE=DATE:20250110
DTEND;VALUE=DATE:20250111
BEGIN:VALARM
ACTION:DISPLAY
TRIGGER:-PT15M
END:VALARM
END:VEVENT
END:VCALENDAR"#;

        let events = parse_events(ics).expect("Should parse");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Blocked night");
    }

    #[test]
    fn test_missing_dtend_fails_whole_feed() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:ok
SUMMARY:Fine
DTSTART:20250101
DTEND:20250102
END:VEVENT
BEGIN:VEVENT
UID:broken
SUMMARY:No end
DTSTART:20250103
END:VEVENT
END:VCALENDAR"#;

        let err = parse_events(ics).expect_err("Missing DTEND should fail");

        assert!(matches!(
            err,
            ImportError::MissingDate { property: "DTEND", .. }
        ));
        assert_eq!(err.to_string(), "Event 'No end' has no DTEND");
    }

    #[test]
    fn test_unparsable_dtstart_fails() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:broken
SUMMARY:Bad start
DTSTART:next tuesday
DTEND:20250102
END:VEVENT
END:VCALENDAR"#;

        let err = parse_events(ics).expect_err("Bad DTSTART should fail");

        assert!(matches!(
            err,
            ImportError::InvalidDate { property: "DTSTART", .. }
        ));
    }

    #[test]
    fn test_missing_summary_uses_placeholder() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:anon
DTSTART:20250101
DTEND:20250102
END:VEVENT
END:VCALENDAR"#;

        let events = parse_events(ics).expect("Should parse");
        assert_eq!(events[0].summary, "(No title)");
    }

    #[test]
    fn test_summary_escapes_and_folding() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:escaped\r\n\
SUMMARY:Room 1\\, Garden View\\; late \r\n checkout\r\n\
DTSTART:20250101\r\n\
DTEND:20250102\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let events = parse_events(ics).expect("Should parse");
        assert_eq!(events[0].summary, "Room 1, Garden View; late checkout");
    }

    #[test]
    fn test_rejects_non_calendar_text() {
        let html = "<!DOCTYPE html><html><body>Service unavailable</body></html>";
        assert!(matches!(parse_events(html), Err(ImportError::IcsParse(_))));

        assert!(matches!(parse_events(""), Err(ImportError::IcsParse(_))));
        assert!(matches!(parse_events("  \r\n"), Err(ImportError::IcsParse(_))));
    }

    #[test]
    fn test_property_names_are_case_insensitive() {
        let ics = "begin:vcalendar\r\n\
version:2.0\r\n\
prodid:TEST\r\n\
begin:vevent\r\n\
uid:lower@test\r\n\
summary:Lower case\r\n\
dtstart:20250101\r\n\
Dtend;Value=DATE:20250102\r\n\
end:vevent\r\n\
end:vcalendar\r\n";

        let events = parse_events(ics).expect("Should parse");

        assert_eq!(
            events,
            vec![FeedEvent {
                summary: "Lower case".to_string(),
                start: date(2025, 1, 1),
                end: date(2025, 1, 2),
            }]
        );
    }

    #[test]
    fn test_parse_failure_is_one_line() {
        let trace = "error: 0: at line 10, in Many0:\n\n^\n\n1: at line 1, in Many1:\nBEGIN:VCALENDAR\n^\n\n";

        assert_eq!(parse_failure(trace), "malformed calendar text at line 10");
        assert_eq!(parse_failure("unexpected end"), "malformed calendar text");
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text(r"a\nb"), "a\nb");
        assert_eq!(unescape_text(r"a\\b"), r"a\b");
        assert_eq!(unescape_text(r"trailing\"), r"trailing\");
        assert_eq!(unescape_text("plain"), "plain");
    }
}
