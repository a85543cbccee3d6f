//! Text formatting for generated documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Printed wherever a value is missing.
pub const PLACEHOLDER: &str = "_______________";

pub fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Spanish numeric date without zero padding: `14/3/2025`.
pub fn format_date_es(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

pub fn format_time_es(moment: NaiveDateTime) -> String {
    moment.format("%H:%M:%S").to_string()
}

/// Parses the timestamp shapes the API emits: RFC 3339, naive ISO date-time
/// with or without fractions, or a bare date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        return Some(moment.naive_local());
    }
    if let Ok(moment) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(moment);
    }
    if let Ok(moment) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(moment);
    }
    NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Date part of an API timestamp, or the placeholder when absent or
/// unparseable.
pub fn format_timestamp_date(value: Option<&str>) -> String {
    value
        .and_then(parse_timestamp)
        .map(|moment| format_date_es(moment.date()))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_gender(code: Option<&str>) -> String {
    match code.map(|c| c.trim().to_uppercase()).as_deref() {
        Some("MALE") | Some("M") | Some("MASCULINO") => "Masculino".to_string(),
        Some("FEMALE") | Some("F") | Some("FEMENINO") => "Femenino".to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_relationship(code: Option<&str>) -> String {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    match code.to_uppercase().as_str() {
        "FATHER" | "PADRE" => "Padre".to_string(),
        "MOTHER" | "MADRE" => "Madre".to_string(),
        "GUARDIAN" | "APODERADO" => "Apoderado".to_string(),
        "GRANDPARENT" => "Abuelo(a)".to_string(),
        "SIBLING" => "Hermano(a)".to_string(),
        "UNCLE" => "Tío(a)".to_string(),
        "OTHER" => "Otro".to_string(),
        _ => code.to_string(),
    }
}

/// `0 Bytes`, `500 Bytes`, `1.5 KB`, `2 MB`: base 1024, at most two
/// decimals, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// `FUT_<requestNumber>_<millis>.pdf`
pub fn document_file_name(request_number: &str, millis: i64) -> String {
    format!("FUT_{}_{}.pdf", request_number, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_for_blank_values() {
        assert_eq!(or_placeholder(None), PLACEHOLDER);
        assert_eq!(or_placeholder(Some("  ")), PLACEHOLDER);
        assert_eq!(or_placeholder(Some(" Lima ")), "Lima");
    }

    #[test]
    fn test_spanish_date_has_no_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(format_date_es(date), "4/3/2025");
    }

    #[test]
    fn test_parse_api_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        for value in [
            "2025-03-14T09:30:05",
            "2025-03-14T09:30:05.123456",
            "2025-03-14T09:30:05Z",
            "2025-03-14",
        ] {
            let parsed = parse_timestamp(value).unwrap_or_else(|| panic!("failed on {}", value));
            assert_eq!(parsed.date(), expected);
        }
        assert_eq!(parse_timestamp("ayer"), None);
        assert_eq!(format_timestamp_date(None), PLACEHOLDER);
        assert_eq!(format_timestamp_date(Some("2025-03-14T09:30:05")), "14/3/2025");
    }

    #[test]
    fn test_file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn test_labels() {
        assert_eq!(format_gender(Some("MALE")), "Masculino");
        assert_eq!(format_gender(None), PLACEHOLDER);
        assert_eq!(format_relationship(Some("MOTHER")), "Madre");
        assert_eq!(format_relationship(Some("Tutora")), "Tutora");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            document_file_name("4567JP", 1_741_944_605_000),
            "FUT_4567JP_1741944605000.pdf"
        );
    }
}
