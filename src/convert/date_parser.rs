use chrono::NaiveDateTime;

const SLASH_TS: &str = "%Y/%m/%d %H:%M:%S";
const DASH_TS: &str = "%Y-%m-%d %H:%M:%S";

/// Parse `"YYYY/MM/DD HH:MM:SS"` or `"YYYY-MM-DD HH:MM:SS"`.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, SLASH_TS)
        .or_else(|_| NaiveDateTime::parse_from_str(s, DASH_TS))
        .ok()
}
