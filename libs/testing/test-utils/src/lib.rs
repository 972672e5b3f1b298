//! Shared test utilities for domain testing
//!
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis", default)
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! ```rust,ignore
//! use test_utils::TestRedis;
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_redis_test() {
//!     let redis = TestRedis::new().await;
//!     let store = queue_worker::RedisQueueStore::new(redis.connection());
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Builder for test data with deterministic randomization
///
/// Tests sharing one Redis can use distinct queue names derived from their
/// own test name.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_task");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic task id
    pub fn task_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Deterministic task title, e.g. `"test-task-12345-main"`
    pub fn title(&self, suffix: &str) -> String {
        format!("test-task-{}-{}", self.seed, suffix)
    }

    /// Queue name unique to this builder's seed
    pub fn queue_name(&self, prefix: &str) -> String {
        format!("{}:test:{}", prefix, self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that each needle occurs in `lines`, in the given order
    pub fn assert_lines_in_order(lines: &[&str], needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            let found = lines[from..]
                .iter()
                .position(|line| line.contains(needle))
                .unwrap_or_else(|| {
                    panic!("expected '{}' after line {} in {:#?}", needle, from, lines)
                });
            from += found + 1;
        }
    }
}
