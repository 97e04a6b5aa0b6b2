//! POS order engine - the service layer over the shared domain types
//!
//! This crate wires the pure pieces together:
//!
//! - **state_machine**: type-conditioned order lifecycle transitions
//! - **settlement**: multi-instrument payment settlement with change math
//! - **session**: scope-keyed cash session ledger
//! - **store**: authoritative order store with optimistic concurrency
//! - **catalog** / **policy**: seams for the external catalog and
//!   identity/authorization collaborators
//! - **service**: the `OrderService` orchestrator
//!
//! # Data Flow
//!
//! 1. A terminal composes a `Cart` client-side (modifier selection is
//!    validated as options are picked)
//! 2. `OrderService::submit_cart` re-validates server-side, computes the
//!    total once, and creates the order in NEW
//! 3. `OrderService::settle` confirms payments against an open cash session
//! 4. Status-board clients poll `active_orders`; transitions are requested
//!    by target status and rejected centrally when invalid
//! 5. Closing the session freezes the expected drawer balance and variance

pub mod catalog;
pub mod codes;
pub mod policy;
pub mod service;
pub mod session;
pub mod settlement;
pub mod state_machine;
pub mod store;

// Re-exports
pub use catalog::{Catalog, StaticCatalog};
pub use codes::OrderCodeGenerator;
pub use policy::{AllowAll, TransitionPolicy};
pub use service::OrderService;
pub use session::SessionLedger;
pub use settlement::SettlementOutcome;
pub use store::{MemoryOrderStore, OrderStore, VersionedOrder};

// Re-export shared types for convenience
pub use shared::{
    Cart, CartLineItem, Currency, Money, Order, OrderStatus, OrderType, Payment, PaymentMethod,
    PosError, PosResult,
};
