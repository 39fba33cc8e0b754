//! Read access to an exported archive.
//!
//! Layout consumed:
//!
//! - `channels.json`: channel metadata
//! - `<channel>/days.json`: available days as `YYYY-MM-DD` strings
//! - `<channel>/<YYYY>-<MM>-<DD>.json`: the raw records of one day
//!
//! Decoded days are cached in memory per (channel, day), up to a fixed
//! number of days. Failed loads are not cached, so a later call retries the
//! fetch.

mod source;

pub use source::{ArchiveSource, FsSource, HttpSource, open_source};

use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::decode::{BatchPolicy, DecodeOptions, DecodeReport, decode_day};
use crate::error::{ArchiveError, ArchiveResult, IntoArchiveError};
use crate::slack::{ChannelInfo, DateKey};

const CHANNELS_FILE: &str = "channels.json";
const DAYS_FILE: &str = "days.json";

/// Decoded days kept in memory when no capacity is configured
pub const DEFAULT_CACHE_DAYS: usize = 32;

type DayCacheKey = (String, DateKey);

/// Least recently used days are evicted once `capacity` is reached.
/// A capacity of zero disables caching.
struct DayCache {
    capacity: usize,
    entries: HashMap<DayCacheKey, Arc<DecodeReport>>,
    order: VecDeque<DayCacheKey>,
}

impl DayCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&mut self, key: &DayCacheKey) -> Option<Arc<DecodeReport>> {
        let report = self.entries.get(key)?.clone();
        self.touch(key);
        Some(report)
    }

    fn insert(&mut self, key: DayCacheKey, report: Arc<DecodeReport>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), report).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                debug!("Evicting {} {} from day cache", evicted.0, evicted.1);
                self.entries.remove(&evicted);
            }
        }
    }

    fn touch(&mut self, key: &DayCacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key)
            && let Some(key) = self.order.remove(pos)
        {
            self.order.push_back(key);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct Archive {
    source: Arc<dyn ArchiveSource>,
    options: DecodeOptions,
    policy: BatchPolicy,
    days: RwLock<DayCache>,
}

impl Archive {
    pub fn new(
        source: Arc<dyn ArchiveSource>,
        options: DecodeOptions,
        policy: BatchPolicy,
        cache_days: usize,
    ) -> Self {
        Self {
            source,
            options,
            policy,
            days: RwLock::new(DayCache::new(cache_days)),
        }
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    pub async fn channels(&self) -> ArchiveResult<Vec<ChannelInfo>> {
        let value = self.source.fetch(CHANNELS_FILE).await?;
        let mut channels: Vec<ChannelInfo> =
            serde_json::from_value(value).archive_context(CHANNELS_FILE)?;
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(channels)
    }

    /// Days with a log for `channel`, oldest first
    pub async fn days(&self, channel: &str) -> ArchiveResult<Vec<DateKey>> {
        let path = format!("{}/{}", channel, DAYS_FILE);
        let value = self.source.fetch(&path).await?;
        let entries: Vec<String> = serde_json::from_value(value).archive_context(&path)?;

        let mut days = entries
            .iter()
            .map(|entry| {
                DateKey::from_file_stem(entry)
                    .ok_or_else(|| format!("invalid day entry {:?}", entry))
                    .archive_context(&path)
            })
            .collect::<ArchiveResult<Vec<_>>>()?;
        days.sort();
        days.dedup();
        Ok(days)
    }

    /// Decoded messages of one day, cached after the first successful load
    pub async fn day(&self, channel: &str, date: DateKey) -> ArchiveResult<Arc<DecodeReport>> {
        let key = (channel.to_string(), date);
        if let Some(report) = self.days.write().await.get(&key) {
            debug!("Cache hit for {} {}", channel, date);
            return Ok(report);
        }

        let report = Arc::new(self.load_day(channel, date).await?);
        self.days.write().await.insert(key, report.clone());
        Ok(report)
    }

    /// Fetch and decode one day without touching the cache
    pub async fn load_day(&self, channel: &str, date: DateKey) -> ArchiveResult<DecodeReport> {
        let path = format!("{}/{}", channel, date.file_name());
        let raw: Value = self.source.fetch(&path).await?;
        let report = decode_day(&raw, &self.options, self.policy)
            .map_err(|e| ArchiveError::decode(&path, e))?;

        if !report.skipped.is_empty() {
            warn!(
                "{}: skipped {} of {} records",
                path,
                report.skipped.len(),
                report.skipped.len() + report.messages.len()
            );
        }
        Ok(report)
    }

    /// Number of days currently held in memory
    pub async fn cached_days(&self) -> usize {
        self.days.read().await.len()
    }
}
