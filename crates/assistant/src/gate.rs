//! Entitlement checks made before any remote call.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Outcome of an entitlement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entitlement {
    Allowed,
    /// Denied, with the message shown to the user.
    Denied(String),
}

/// Decides whether an instruction may be forwarded to the remote model.
///
/// Only consulted after local handling declined the instruction.
#[async_trait]
pub trait EntitlementGate: Send + Sync {
    async fn check(&self) -> Entitlement;
}

/// Gate that never denies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl EntitlementGate for AllowAll {
    async fn check(&self) -> Entitlement {
        Entitlement::Allowed
    }
}

/// Fixed number of remote calls for the life of the process.
#[derive(Debug)]
pub struct QuotaGate {
    limit: usize,
    used: AtomicUsize,
}

impl QuotaGate {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl EntitlementGate for QuotaGate {
    async fn check(&self) -> Entitlement {
        let granted = self
            .used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                (used < self.limit).then_some(used + 1)
            })
            .is_ok();

        if granted {
            Entitlement::Allowed
        } else {
            Entitlement::Denied(format!(
                "AI assistant quota of {} requests is used up; local commands still work",
                self.limit
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quota_gate_counts_down() {
        let gate = QuotaGate::new(2);
        assert_eq!(gate.check().await, Entitlement::Allowed);
        assert_eq!(gate.remaining(), 1);
        assert_eq!(gate.check().await, Entitlement::Allowed);
        assert!(matches!(gate.check().await, Entitlement::Denied(_)));
        assert_eq!(gate.remaining(), 0);
    }

    #[tokio::test]
    async fn test_zero_quota_denies() {
        let gate = QuotaGate::new(0);
        let Entitlement::Denied(message) = gate.check().await else {
            panic!("expected denial");
        };
        assert!(message.contains("quota of 0"));
    }

    #[tokio::test]
    async fn test_allow_all() {
        assert_eq!(AllowAll.check().await, Entitlement::Allowed);
    }
}
