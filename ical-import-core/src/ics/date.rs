//! DTSTART/DTEND values reduced to calendar dates.

use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{CalendarDateTime, DatePerhapsTime, parser::Property};

/// Calendar date of a date or date-time property.
///
/// The date is read in the value's own frame: UTC values give the UTC date,
/// floating and TZID values give their wall-clock date. Nothing is converted
/// between zones.
pub(crate) fn property_date(prop: &Property) -> Option<NaiveDate> {
    match DatePerhapsTime::try_from(prop) {
        Ok(dpt) => Some(calendar_date(dpt)),
        Err(_) => parse_raw_date(prop.val.as_ref()),
    }
}

fn calendar_date(dpt: DatePerhapsTime) -> NaiveDate {
    match dpt {
        DatePerhapsTime::Date(date) => date,
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.date_naive(),
            CalendarDateTime::Floating(naive) => naive.date(),
            CalendarDateTime::WithTimezone { date_time, .. } => date_time.date(),
        },
    }
}

/// Fallback for values the icalendar crate rejects, e.g. a bare
/// `DTSTART:20250101` without `VALUE=DATE`.
fn parse_raw_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return Some(date);
    }

    let value = value.strip_suffix('Z').unwrap_or(value);
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.date())
}
