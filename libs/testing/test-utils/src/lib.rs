//! Shared test utilities for the domain crates
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data generation
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires a Docker daemon"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let role_name = builder.role_name("main");
//!     let email = builder.email("john");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Password that satisfies the employee password policy.
pub const VALID_PASSWORD: &str = "Pass@123";

/// Builder for test data with deterministic values
///
/// Tests sharing one database stay independent as long as each uses its own
/// test name.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is a hash of the name)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_role");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Role name unique to this builder, always within the 3..=64 length bounds.
    pub fn role_name(&self, suffix: &str) -> String {
        let name = format!("role-{:x}-{}", self.seed, suffix);
        name.chars().take(64).collect()
    }

    /// Lower-case email unique to this builder.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let email = TestDataBuilder::new(255).email("john");
    /// assert_eq!(email, "john.ff@example.com");
    /// ```
    pub fn email(&self, local: &str) -> String {
        format!("{}.{:x}@example.com", local.to_lowercase(), self.seed)
    }

    /// Generic unique name, e.g. `test-employee-12345-main`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.email("a"), builder2.email("a"));
        assert_eq!(builder1.role_name("dev"), builder2.role_name("dev"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.email("a"), builder2.email("a"));
    }

    #[test]
    fn role_name_stays_within_bounds() {
        let name = TestDataBuilder::new(u64::MAX).role_name(&"x".repeat(100));
        assert!(name.chars().count() <= 64);
        assert!(name.chars().count() >= 3);
    }
}
