use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Entries kept before the oldest response is evicted.
pub const DEFAULT_CAPACITY: usize = 256;

/// Exact (job description, resume text) pair a model response was produced for.
type CacheKey = (Option<String>, String);

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<CacheKey, String>,
    // Keys in insertion order; front is evicted first.
    order: VecDeque<CacheKey>,
}

/// Memoizes raw model responses so an identical resubmission skips the model call.
///
/// Only successful responses are stored. Holds at most `capacity` entries;
/// inserting a new pair into a full cache drops the oldest one.
#[derive(Debug)]
pub struct ResponseCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn get(&self, job_description: Option<&str>, resume_text: &str) -> Option<String> {
        let key = (job_description.map(String::from), resume_text.to_string());
        self.lock().map.get(&key).cloned()
    }

    pub fn insert(&self, job_description: Option<&str>, resume_text: &str, response: String) {
        if self.capacity == 0 {
            return;
        }
        let key = (job_description.map(String::from), resume_text.to_string());
        let mut entries = self.lock();

        if let Some(existing) = entries.map.get_mut(&key) {
            *existing = response;
            return;
        }

        while entries.map.len() >= self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.map.remove(&oldest);
                }
                None => break,
            }
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, response);
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        // A poisoned map still holds valid responses.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
