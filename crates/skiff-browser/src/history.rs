//! History store: append-only log of visited pages, persisted as JSON.
//!
//! The file is a pretty-printed array of `{url, title, timestamp}` objects.
//! Reading is tolerant: a missing or corrupt file yields an empty log, and
//! individual records that lack a URL or carry an unparseable timestamp are
//! dropped. Failures never reach the caller; they are logged at `warn`.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize, Serializer};

use skiff_types::error::{Result, SkiffError};

/// Timestamp format used on disk and in menu labels.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// -----------------------------------------------------------------------
// HistoryEntry
// -----------------------------------------------------------------------

/// One successfully loaded page view. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    url: String,
    title: String,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: NaiveDateTime,
}

impl HistoryEntry {
    /// Build an entry. An empty title falls back to the URL.
    pub fn new(url: &str, title: &str, timestamp: NaiveDateTime) -> Self {
        let title = if title.is_empty() { url } else { title };
        Self {
            url: url.to_string(),
            title: title.to_string(),
            timestamp: timestamp.trunc_subsecs(0),
        }
    }

    /// Build an entry stamped with the current local time.
    pub fn capture(url: &str, title: &str) -> Self {
        Self::new(url, title, Local::now().naive_local())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

/// On-disk record shape accepted when reading. Titles may be absent.
#[derive(Deserialize)]
struct StoredEntry {
    url: String,
    #[serde(default)]
    title: String,
    timestamp: String,
}

impl TryFrom<StoredEntry> for HistoryEntry {
    type Error = SkiffError;

    fn try_from(raw: StoredEntry) -> Result<Self> {
        if raw.url.is_empty() {
            return Err(SkiffError::History("entry has an empty url".into()));
        }
        let ts = NaiveDateTime::parse_from_str(&raw.timestamp, TIMESTAMP_FORMAT).map_err(|e| {
            SkiffError::History(format!("bad timestamp {:?}: {e}", raw.timestamp))
        })?;
        Ok(Self::new(&raw.url, &raw.title, ts))
    }
}

// -----------------------------------------------------------------------
// HistoryLog
// -----------------------------------------------------------------------

/// Ordered visit log. Insertion order is visit order; no de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry at the end.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently appended entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Serialize as the pretty-printed JSON document used on disk.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Parse a JSON document, dropping records that fail validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let parsed = serde_json::from_value::<StoredEntry>(value)
                .map_err(SkiffError::from)
                .and_then(HistoryEntry::try_from);
            match parsed {
                Ok(entry) => entries.push(entry),
                Err(e) => log::warn!("Skipping history record {i}: {e}"),
            }
        }
        Ok(Self { entries })
    }
}

// -----------------------------------------------------------------------
// HistoryStore
// -----------------------------------------------------------------------

/// Durable home of the history log.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted log. Missing, unreadable or corrupt files yield an
    /// empty log.
    pub fn load(&self) -> HistoryLog {
        match self.read() {
            Ok(log) => log,
            Err(e) => {
                log::warn!(
                    "History file {} unreadable, starting empty: {e}",
                    self.path.display()
                );
                HistoryLog::new()
            },
        }
    }

    /// Append `entry` to `log`, then rewrite the whole file. A failed write
    /// leaves the in-memory log ahead of the persisted copy.
    pub fn append_and_persist(&self, log: &mut HistoryLog, entry: HistoryEntry) {
        log.push(entry);
        if let Err(e) = self.write(log) {
            log::warn!(
                "Failed to persist history to {}: {e}",
                self.path.display()
            );
        }
    }

    /// Fallible read. A missing file is an empty log, not an error.
    pub fn read(&self) -> Result<HistoryLog> {
        if !self.path.exists() {
            return Ok(HistoryLog::new());
        }
        let text = fs::read_to_string(&self.path)?;
        HistoryLog::from_json(&text)
    }

    /// Fallible write via a sibling temporary file and rename.
    pub fn write(&self, log: &HistoryLog) -> Result<()> {
        let json = log.to_json()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                log::warn!("Could not remove {}: {cleanup}", tmp_path.display());
            }
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn entry(url: &str, title: &str) -> HistoryEntry {
        HistoryEntry::new(url, title, ts(12, 0, 0))
    }

    #[test]
    fn empty_title_falls_back_to_url() {
        let e = entry("https://a.com", "");
        assert_eq!(e.title(), "https://a.com");
    }

    #[test]
    fn capture_truncates_subseconds() {
        let e = HistoryEntry::capture("https://a.com", "A");
        assert_eq!(e.timestamp().and_utc().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn timestamp_string_format() {
        let e = HistoryEntry::new("https://a.com", "A", ts(9, 5, 3));
        assert_eq!(e.timestamp_string(), "2024-05-17 09:05:03");
    }

    #[test]
    fn json_shape_matches_file_format() {
        let log = HistoryLog::from_entries(vec![entry("https://a.com", "Ä title")]);
        let json = log.to_json().unwrap();
        let expected = "[\n  {\n    \"url\": \"https://a.com\",\n    \"title\": \"Ä title\",\n    \"timestamp\": \"2024-05-17 12:00:00\"\n  }\n]";
        assert_eq!(json, expected);
    }

    #[test]
    fn from_json_drops_invalid_records() {
        let json = r#"[
            {"url": "https://a.com", "title": "A", "timestamp": "2024-05-17 12:00:00"},
            {"url": "", "title": "empty", "timestamp": "2024-05-17 12:00:00"},
            {"title": "no url", "timestamp": "2024-05-17 12:00:00"},
            {"url": "https://b.com", "title": "B", "timestamp": "yesterday"},
            {"url": "https://c.com", "timestamp": "2024-05-17 12:00:01"},
            42
        ]"#;
        let log = HistoryLog::from_json(json).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].url(), "https://a.com");
        assert_eq!(log.entries()[1].url(), "https://c.com");
        assert_eq!(log.entries()[1].title(), "https://c.com");
    }

    #[test]
    fn from_json_rejects_non_array() {
        assert!(HistoryLog::from_json("{\"url\": \"x\"}").is_err());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "[{not json").unwrap();
        let store = HistoryStore::new(&path);
        assert!(store.load().is_empty());
        assert!(store.read().is_err());
    }

    #[test]
    fn append_and_persist_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let mut log = store.load();

        store.append_and_persist(&mut log, entry("https://a.com", "A"));
        store.append_and_persist(&mut log, entry("https://a.com", "A"));
        store.append_and_persist(&mut log, entry("https://b.com", "B"));

        assert_eq!(log.len(), 3);
        assert_eq!(store.load(), log);
        assert!(!dir.path().join("history.json.tmp").exists());
    }

    #[test]
    fn append_survives_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // The target path is a directory, so the rename cannot succeed.
        let path = dir.path().join("history.json");
        fs::create_dir(&path).unwrap();
        let store = HistoryStore::new(&path);

        let mut log = HistoryLog::new();
        store.append_and_persist(&mut log, entry("https://a.com", "A"));
        assert_eq!(log.len(), 1);
        assert!(store.load().is_empty());
        assert!(!dir.path().join("history.json.tmp").exists());
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested/deeper/history.json"));
        let log = HistoryLog::from_entries(vec![entry("https://a.com", "A")]);
        store.write(&log).unwrap();
        assert_eq!(store.read().unwrap(), log);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_entry() -> impl Strategy<Value = HistoryEntry> {
            (
                "[a-z]{3,10}",
                "[ -~]{0,40}",
                0u32..24,
                0u32..60,
                0u32..60,
            )
                .prop_map(|(host, title, h, m, s)| {
                    HistoryEntry::new(&format!("https://{host}.com"), &title, ts(h, m, s))
                })
        }

        proptest! {
            #[test]
            fn n_appends_persist_n_entries_in_order(
                entries in proptest::collection::vec(arb_entry(), 0..30),
            ) {
                let dir = tempfile::tempdir().unwrap();
                let store = HistoryStore::new(dir.path().join("history.json"));
                let mut log = HistoryLog::new();
                for e in &entries {
                    store.append_and_persist(&mut log, e.clone());
                }
                prop_assert_eq!(log.entries(), entries.as_slice());
                let reloaded = store.load();
                prop_assert_eq!(reloaded.entries(), entries.as_slice());
            }
        }
    }
}
