//! Tokenizer for `dd.mm.yyyy HH:MM <text>` reminder requests.

use chrono::{NaiveDate, NaiveDateTime};

/// Split a reminder request into its due time and payload.
///
/// Shape: `d{1,2}.d{1,2}.d{4} d{2}:d{2} <payload>`, single spaces between
/// the parts, payload non-empty and not starting with whitespace. Returns
/// `None` when the shape does not match or the date/time does not exist.
pub fn split_schedule(text: &str) -> Option<(NaiveDateTime, &str)> {
    let (date, rest) = text.split_once(' ')?;
    let (time, payload) = rest.split_once(' ')?;
    if payload.is_empty() || payload.starts_with(char::is_whitespace) {
        return None;
    }
    Some((parse_due(date, time)?, payload))
}

/// Parse `d.m.yyyy` and `HH:MM` into a local date-time.
fn parse_due(date: &str, time: &str) -> Option<NaiveDateTime> {
    let [day, month, year] = numeric_fields(date, '.', [(1, 2), (1, 2), (4, 4)])?;
    let [hour, minute] = numeric_fields(time, ':', [(2, 2), (2, 2)])?;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?.and_hms_opt(hour, minute, 0)
}

/// Split `token` on `sep` into exactly `N` ASCII-digit fields whose lengths
/// fall within the given inclusive bounds.
fn numeric_fields<const N: usize>(
    token: &str,
    sep: char,
    widths: [(usize, usize); N],
) -> Option<[u32; N]> {
    let mut out = [0u32; N];
    let mut parts = token.split(sep);
    for (slot, (min, max)) in out.iter_mut().zip(widths) {
        let part = parts.next()?;
        if part.len() < min || part.len() > max || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}
