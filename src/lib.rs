//! # Membership Core
//!
//! A membership and dues-management library providing a payment ledger with
//! reconciled member aggregates, capital build-up (CBU) tracking, and
//! progress reporting.
//!
//! ## Features
//!
//! - **Payment ledger**: create, edit, and soft-delete payments with audit
//!   timestamps; tombstoned rows are kept but excluded from computation
//! - **Aggregate reconciliation**: a member's `cbu`, `monthly_dues`, and
//!   `daily_dues` balances always equal the summed effect of live payments,
//!   maintained through explicit apply/reverse deltas
//! - **Configurable CBU policy**: which membership types auto-credit CBU
//!   from monthly dues is data, not code
//! - **Member management**: enrollment, profile updates, membership types
//! - **Progress reporting**: fee balances and CBU target progress
//! - **Storage abstraction**: database-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use membership_core::{MembershipLedger, MembershipType, NewMember, PaymentType};
//! use bigdecimal::BigDecimal;
//!
//! // This example shows basic usage - you need to implement MembershipStorage,
//! // or use the bundled MemoryStorage:
//! // let storage = membership_core::utils::MemoryStorage::new();
//! // let mut ledger = MembershipLedger::new(storage);
//! ```

pub mod ledger;
pub mod progress;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
