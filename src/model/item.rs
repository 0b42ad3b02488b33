// File: ./src/model/item.rs
// Core conference record types and date handling.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Naive datetime layouts interpreted in the local timezone.
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A date-like field as it appeared in the source data.
///
/// The raw text is always kept so a malformed value can still be shown or
/// logged; `parsed` is `None` when the text is not a recognizable date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    pub raw: String,
    pub parsed: Option<DateTime<Utc>>,
}

impl DateField {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            parsed: parse_date_value(raw),
        }
    }

    pub fn from_instant(dt: DateTime<Utc>) -> Self {
        Self {
            raw: dt.to_rfc3339(),
            parsed: Some(dt),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.parsed
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for DateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Parses the date spellings found in conference data files.
///
/// Date-only ISO values are midnight UTC, naive datetimes are local time.
pub fn parse_date_value(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in LOCAL_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return date.and_hms_opt(0, 0, 0).and_then(|n| {
            Local
                .from_local_datetime(&n)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        });
    }

    None
}

/// Any YAML/JSON scalar. Hand-edited data files mix quoted and bare values.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn deserialize_date_field<'de, D>(deserializer: D) -> Result<Option<DateField>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value
        .map(Scalar::into_text)
        .filter(|s| !s.trim().is_empty())
        .map(|s| DateField::parse(&s)))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.map(Scalar::into_text))
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Scalar::Int(i) => i32::try_from(i).ok(),
        Scalar::Str(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// One year's edition of a conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceInstance {
    #[serde(deserialize_with = "deserialize_name")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date_field")]
    pub date: Option<DateField>,
    #[serde(default, deserialize_with = "deserialize_date_field")]
    pub deadline: Option<DateField>,
    #[serde(default, deserialize_with = "deserialize_date_field")]
    pub notification_date: Option<DateField>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub place: Option<String>,
}

impl ConferenceInstance {
    pub fn new(name: &str, year: Option<i32>) -> Self {
        Self {
            name: name.to_string(),
            year,
            link: None,
            description: None,
            note: None,
            date: None,
            deadline: None,
            notification_date: None,
            place: None,
        }
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(DateField::from_instant(deadline));
        self
    }

    /// Display key. Not unique if the source lists an edition twice.
    pub fn key(&self) -> String {
        match self.year {
            Some(y) => format!("{}-{}", self.name, y),
            None => self.name.clone(),
        }
    }

    /// Parsed deadline, if present and valid.
    pub fn deadline_instant(&self) -> Option<DateTime<Utc>> {
        self.deadline.as_ref().and_then(DateField::instant)
    }

    /// Strictly after `now`. Missing or malformed deadlines are never upcoming.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.deadline_instant().is_some_and(|d| d > now)
    }

    /// Case-insensitive substring match on the name. Empty terms match everything.
    pub fn matches_search_term(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}
