use crate::utils::error::{Result, StorageError};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::Deserialize;

/// One record of a storage-zone directory listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DirEntry {
    pub object_name: String,
    pub is_directory: bool,
    pub date_created: String,
    pub last_changed: String,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
}

/// The part of a listing record `listdir` needs. Records with missing or null
/// timestamps still list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ListedObject {
    pub object_name: String,
    pub is_directory: bool,
}

/// Which listing field a timestamp lookup reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Created,
    Modified,
}

impl TimeField {
    pub fn json_key(self) -> &'static str {
        match self {
            TimeField::Created => "DateCreated",
            TimeField::Modified => "LastChanged",
        }
    }

    pub fn operation(self) -> &'static str {
        match self {
            TimeField::Created => "get_created_time",
            TimeField::Modified => "get_modified_time",
        }
    }

    pub fn read(self, entry: &DirEntry) -> &str {
        match self {
            TimeField::Created => &entry.date_created,
            TimeField::Modified => &entry.last_changed,
        }
    }
}

/// A listing timestamp after timezone normalization.
///
/// With `use_tz` enabled the value is an aware UTC instant; otherwise it is the
/// local wall-clock time with the offset dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Aware(DateTime<Utc>),
    Naive(NaiveDateTime),
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Timestamp {
    /// Parses an ISO-8601 value. Values without an offset are UTC, which is
    /// what the storage API emits.
    pub fn parse(value: &str, use_tz: bool) -> Result<Self> {
        let utc = parse_utc(value)?;
        if use_tz {
            Ok(Timestamp::Aware(utc))
        } else {
            Ok(Timestamp::Naive(utc.with_timezone(&Local).naive_local()))
        }
    }

    pub fn is_aware(&self) -> bool {
        matches!(self, Timestamp::Aware(_))
    }

    /// Back to an absolute instant. Naive values are read as local time.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Timestamp::Aware(dt) => *dt,
            Timestamp::Naive(naive) => naive
                .and_local_timezone(Local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc()),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Aware(dt) => write!(f, "{}", dt.to_rfc3339()),
            Timestamp::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

fn parse_utc(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(StorageError::TimestampParseError {
        value: value.to_string(),
        reason: "expected an ISO-8601 date and time".to_string(),
    })
}
