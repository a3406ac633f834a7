//! API key ring with round-robin rotation.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::info;
use vendor_core::{Result, VendorError};

/// Number of leading key characters shown in logs and status reports.
const VISIBLE_KEY_CHARS: usize = 8;

/// Masks an API key for display.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(VISIBLE_KEY_CHARS).collect();
    format!("{visible}...")
}

/// Rotation state and usage counts of the configured API keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeyStatus {
    /// Number of configured keys.
    pub total_keys: usize,
    /// Masked key used for the next request.
    pub current_key: String,
    /// Position of the current key.
    pub current_index: usize,
    /// Requests made per masked key.
    pub usage_counts: BTreeMap<String, u64>,
}

#[derive(Debug)]
struct RingState {
    current: usize,
    usage: Vec<u64>,
}

/// A non-empty set of API keys used in turn.
///
/// The ring only moves on [`rotate`](Self::rotate); a single key never rotates.
#[derive(Debug)]
pub struct ApiKeyRing {
    keys: Vec<String>,
    state: Mutex<RingState>,
}

impl ApiKeyRing {
    /// Creates a key ring. Blank keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`VendorError::AuthenticationFailed`] when no key remains.
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(VendorError::AuthenticationFailed(
                "Alpha Vantage (no API keys configured)".to_string(),
            ));
        }

        info!(keys = keys.len(), "Loaded API key(s) for rotation");
        let usage = vec![0; keys.len()];
        Ok(Self {
            keys,
            state: Mutex::new(RingState { current: 0, usage }),
        })
    }

    fn state(&self) -> MutexGuard<'_, RingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; a ring holds at least one key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the index and value of the key to use next.
    #[must_use]
    pub fn current(&self) -> (usize, &str) {
        let index = self.state().current;
        (index, &self.keys[index])
    }

    /// Counts one request made with the key at `index`.
    pub fn record_use(&self, index: usize) {
        if let Some(count) = self.state().usage.get_mut(index) {
            *count += 1;
        }
    }

    /// Moves to the next key. Returns false when there is nothing to rotate to.
    pub fn rotate(&self) -> bool {
        if self.keys.len() < 2 {
            return false;
        }
        let mut state = self.state();
        let old = state.current;
        state.current = (old + 1) % self.keys.len();
        info!(
            from = %mask_key(&self.keys[old]),
            to = %mask_key(&self.keys[state.current]),
            "Rotated API key"
        );
        true
    }

    /// Returns a masked snapshot of the ring.
    #[must_use]
    pub fn status(&self) -> KeyStatus {
        let state = self.state();
        let mut usage_counts = BTreeMap::new();
        for (key, count) in self.keys.iter().zip(&state.usage) {
            *usage_counts.entry(mask_key(key)).or_insert(0) += count;
        }
        KeyStatus {
            total_keys: self.keys.len(),
            current_key: mask_key(&self.keys[state.current]),
            current_index: state.current,
            usage_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("ABCDEFGHIJKL"), "ABCDEFGH...");
        assert_eq!(mask_key("ABC"), "ABC...");
    }

    #[test]
    fn test_empty_ring_is_rejected() {
        let err = ApiKeyRing::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, VendorError::AuthenticationFailed(_)));
        assert!(ApiKeyRing::new(["", "  "]).is_err());
    }

    #[test]
    fn test_round_robin_rotation() {
        let ring = ApiKeyRing::new(["key-one-0001", "key-two-0002", "key-three-03"]).unwrap();
        assert_eq!(ring.current(), (0, "key-one-0001"));
        assert!(ring.rotate());
        assert_eq!(ring.current(), (1, "key-two-0002"));
        assert!(ring.rotate());
        assert!(ring.rotate());
        assert_eq!(ring.current(), (0, "key-one-0001"));
    }

    #[test]
    fn test_single_key_never_rotates() {
        let ring = ApiKeyRing::new(["only-key-123"]).unwrap();
        assert!(!ring.rotate());
        assert_eq!(ring.current(), (0, "only-key-123"));
    }

    #[test]
    fn test_status_masks_keys() {
        let ring = ApiKeyRing::new(["SECRETKEY0001", "SECRETKEY0002"]).unwrap();
        ring.record_use(0);
        ring.record_use(0);
        ring.rotate();
        ring.record_use(1);

        let status = ring.status();
        assert_eq!(status.total_keys, 2);
        assert_eq!(status.current_index, 1);
        assert_eq!(status.current_key, "SECRETKE...");
        // both keys share a masked prefix
        assert_eq!(status.usage_counts.get("SECRETKE..."), Some(&3));

        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("SECRETKEY0001"));
    }
}
