//! Keyed async gates.
//!
//! One `tokio` mutex per key, created on demand. Work on different keys
//! runs concurrently; work on the same key runs one at a time in arrival
//! order. Idle gates are dropped on the next acquisition.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// Serializes work per key.
#[derive(Debug)]
pub struct KeyedGate<K> {
    gates: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K> Default for KeyedGate<K> {
    fn default() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedGate<K>
where
    K: Eq + Hash + Copy,
{
    /// Wait for exclusive access to a key.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let gate = {
            let mut gates = self.gates.lock();
            // Only the map holds an idle gate.
            gates.retain(|_, gate| Arc::strong_count(gate) > 1);
            Arc::clone(gates.entry(key).or_default())
        };
        gate.lock_owned().await
    }

    /// Number of gates currently in use.
    pub fn active(&self) -> usize {
        self.gates
            .lock()
            .values()
            .filter(|gate| Arc::strong_count(gate) > 1)
            .count()
    }
}
