//! # Asynchronous Validators
//!
//! Some rules need to ask something outside the request (is this e-mail
//! already registered?). They get their own capability, [`AsyncValidator`],
//! and their own execution path in [`crate::Schema::evaluate_async`]:
//!
//! 1. the synchronous pass runs first;
//! 2. fields that passed it run their async validators in declaration
//!    order, first failure wins;
//! 3. different fields are checked concurrently;
//! 4. the evaluation returns only after every async check has finished.
//!
//! The synchronous [`crate::Schema::evaluate`] never runs async validators.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use serde_json::Value;

/// A validation rule whose verdict must be awaited.
#[async_trait]
pub trait AsyncValidator: Send + Sync {
    /// Check `value`; `key` is the name reported in the message.
    async fn check(&self, value: Option<&Value>, key: &str) -> Option<String>;
}

/// Source of already-registered e-mail addresses.
#[async_trait]
pub trait EmailLookup: Send + Sync {
    /// Whether `email` is already taken.
    async fn is_taken(&self, email: &str) -> bool;
}

#[async_trait]
impl EmailLookup for Vec<String> {
    async fn is_taken(&self, email: &str) -> bool {
        self.iter().any(|e| e == email)
    }
}

#[async_trait]
impl EmailLookup for HashSet<String> {
    async fn is_taken(&self, email: &str) -> bool {
        self.contains(email)
    }
}

#[async_trait]
impl EmailLookup for BTreeSet<String> {
    async fn is_taken(&self, email: &str) -> bool {
        self.contains(email)
    }
}

/// Rejects e-mail addresses that the lookup reports as taken.
///
/// Only strings are looked up; type and shape are left to the synchronous
/// validators that run before this one.
#[derive(Debug, Clone)]
pub struct UniqueEmail<L> {
    lookup: L,
}

/// Build a uniqueness check over `lookup`.
pub fn is_email_unique<L: EmailLookup>(lookup: L) -> UniqueEmail<L> {
    UniqueEmail { lookup }
}

#[async_trait]
impl<L: EmailLookup> AsyncValidator for UniqueEmail<L> {
    async fn check(&self, value: Option<&Value>, key: &str) -> Option<String> {
        let email = value?.as_str()?;
        if self.lookup.is_taken(email).await {
            Some(format!("Invalid {key}: {email} is already registered"))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn taken_email_rejected_with_key() {
        let v = is_email_unique(vec!["ann@example.com".to_string()]);
        let msg = v.check(Some(&json!("ann@example.com")), "email").await;
        assert_eq!(
            msg.as_deref(),
            Some("Invalid email: ann@example.com is already registered")
        );
    }

    #[tokio::test]
    async fn free_email_accepted() {
        let taken: HashSet<String> = ["ann@example.com".to_string()].into_iter().collect();
        let v = is_email_unique(taken);
        assert_eq!(v.check(Some(&json!("bob@example.com")), "email").await, None);
    }

    #[tokio::test]
    async fn non_strings_and_absent_values_are_skipped() {
        let v = is_email_unique(BTreeSet::from(["1".to_string()]));
        assert_eq!(v.check(None, "email").await, None);
        assert_eq!(v.check(Some(&json!(1)), "email").await, None);
    }

    struct Counting(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl EmailLookup for Counting {
        async fn is_taken(&self, _email: &str) -> bool {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            tokio::task::yield_now().await;
            false
        }
    }

    #[tokio::test]
    async fn custom_lookup_is_awaited() {
        let v = is_email_unique(Counting(0.into()));
        assert_eq!(v.check(Some(&json!("a@b.c")), "email").await, None);
        assert_eq!(v.lookup.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
