//! Ledger module containing member management and payment transitions

pub mod core;
pub mod member;
pub mod payment;

pub use self::core::*;
pub use self::member::*;
pub use self::payment::*;
