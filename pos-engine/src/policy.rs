//! Role policy seam - the external identity/authorization collaborator
//!
//! The core enforces only type/state validity of transitions; which role may
//! request which transition (e.g. only certain roles cancel or
//! force-complete) is this collaborator's call. [`AllowAll`] is the default
//! for deployments that gate upstream.

use async_trait::async_trait;
use shared::error::{PosError, PosResult};
use shared::models::order::OrderStatus;

/// Allow/deny decision for a requested status transition
#[async_trait]
pub trait TransitionPolicy: Send + Sync {
    /// Deny with `TransitionDenied` when `acting_role` may not request a
    /// transition to `target`
    async fn authorize(&self, acting_role: &str, order_id: &str, target: OrderStatus)
    -> PosResult<()>;
}

/// Permits every role to request every transition
#[derive(Debug, Default)]
pub struct AllowAll;

#[async_trait]
impl TransitionPolicy for AllowAll {
    async fn authorize(
        &self,
        _acting_role: &str,
        _order_id: &str,
        _target: OrderStatus,
    ) -> PosResult<()> {
        Ok(())
    }
}

/// Convenience constructor for denials, for adapter implementations
pub fn deny(acting_role: &str, target: OrderStatus) -> PosError {
    PosError::TransitionDenied {
        role: acting_role.to_string(),
        to: target,
    }
}
