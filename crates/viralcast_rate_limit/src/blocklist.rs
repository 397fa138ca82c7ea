//! Set of providers a router skips after hitting a rate limit.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Names of providers a router skips after a rate-limit class failure.
///
/// Every entry remembers when it was (re)listed. A listed provider is skipped
/// only while its cooldown runs; afterwards the router may try it again, and a
/// success removes the entry while another rate-limit failure relists it.
///
/// Owned by a single router; interior mutability lets the router mutate it
/// through `&self` while calls are in flight.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use viralcast_rate_limit::Blocklist;
///
/// let blocklist = Blocklist::default();
/// assert!(blocklist.insert("Groq"));
/// assert!(blocklist.contains("Groq"));
/// assert!(blocklist.is_blocking("Groq", Duration::from_secs(60)));
/// assert!(!blocklist.is_blocking("Groq", Duration::ZERO));
/// assert!(blocklist.remove("Groq"));
/// assert!(blocklist.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Blocklist {
    entries: Mutex<HashMap<String, Instant>>,
}

impl Blocklist {
    /// Whether `name` is listed, regardless of cooldown.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// Whether `name` is listed and was listed less than `cooldown` ago.
    pub fn is_blocking(&self, name: &str, cooldown: Duration) -> bool {
        self.entries
            .lock()
            .get(name)
            .is_some_and(|listed_at| listed_at.elapsed() < cooldown)
    }

    /// Lists `name`, restarting its cooldown. Returns `true` if it was not listed before.
    pub fn insert(&self, name: &str) -> bool {
        let inserted = self
            .entries
            .lock()
            .insert(name.to_string(), Instant::now())
            .is_none();
        if inserted {
            debug!(provider = name, "Provider added to blocklist");
        } else {
            debug!(provider = name, "Provider blocklist entry renewed");
        }
        inserted
    }

    /// Unlists `name`. Returns `true` if it was listed.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.entries.lock().remove(name).is_some();
        if removed {
            debug!(provider = name, "Provider removed from blocklist");
        }
        removed
    }

    /// Unlists every provider.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of listed providers.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is listed.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Sorted copy of the listed names.
    pub fn snapshot(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relisting_renews_entry() {
        let blocklist = Blocklist::default();
        assert!(blocklist.insert("OpenAI"));
        assert!(!blocklist.insert("OpenAI"));
        assert_eq!(blocklist.len(), 1);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let blocklist = Blocklist::default();
        blocklist.insert("Groq");
        blocklist.insert("DeepSeek");
        blocklist.insert("Gemini");
        assert_eq!(blocklist.snapshot(), vec!["DeepSeek", "Gemini", "Groq"]);
        blocklist.clear();
        assert!(blocklist.snapshot().is_empty());
    }

    #[test]
    fn test_unlisted_never_blocks() {
        let blocklist = Blocklist::default();
        assert!(!blocklist.is_blocking("Gemini", Duration::MAX));
        assert!(!blocklist.remove("Gemini"));
    }
}
