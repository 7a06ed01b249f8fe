//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::reconciliation::AggregateDelta;
use crate::types::*;

/// Storage abstraction for the membership ledger
///
/// This trait allows the core to work with any transactional backend
/// (PostgreSQL, MySQL, SQLite, in-memory, etc.) by implementing these
/// methods. The payment write and the member aggregate write remain two
/// separate operations; backends wanting stronger guarantees can wrap the
/// pair in a single transaction behind this trait.
#[async_trait]
pub trait MembershipStorage: Send + Sync {
    /// Save a membership type to storage
    async fn save_membership_type(&mut self, membership_type: &MembershipType)
        -> LedgerResult<()>;

    /// Get a membership type by ID
    async fn get_membership_type(&self, type_id: &str) -> LedgerResult<Option<MembershipType>>;

    /// List all membership types, ordered by name
    async fn list_membership_types(&self) -> LedgerResult<Vec<MembershipType>>;

    /// Save a member to storage
    async fn save_member(&mut self, member: &Member) -> LedgerResult<()>;

    /// Get a member by ID
    async fn get_member(&self, member_id: &str) -> LedgerResult<Option<Member>>;

    /// List members ordered by name, optionally filtered by membership type
    async fn list_members(&self, membership_type_id: Option<&str>) -> LedgerResult<Vec<Member>>;

    /// Update a member's profile fields
    async fn update_member(&mut self, member: &Member) -> LedgerResult<()>;

    /// Delete a member
    async fn delete_member(&mut self, member_id: &str) -> LedgerResult<()>;

    /// Apply a relative aggregate delta to a member, atomically
    ///
    /// The delta must be applied against the backend's current row, not a
    /// value read earlier by the caller; that is what keeps two concurrent
    /// transitions against the same member from losing an update. With
    /// `clamp_at_zero`, every resulting aggregate is floored at zero.
    async fn apply_member_delta(
        &mut self,
        member_id: &str,
        delta: &AggregateDelta,
        clamp_at_zero: bool,
    ) -> LedgerResult<Member>;

    /// Save a payment to storage
    async fn save_payment(&mut self, payment: &Payment) -> LedgerResult<()>;

    /// Get a payment by ID (tombstoned rows included)
    async fn get_payment(&self, payment_id: &str) -> LedgerResult<Option<Payment>>;

    /// Update a payment
    async fn update_payment(&mut self, payment: &Payment) -> LedgerResult<()>;

    /// List a member's payments, newest first
    ///
    /// Tombstoned rows are excluded unless `include_deleted` is set.
    async fn list_member_payments(
        &self,
        member_id: &str,
        include_deleted: bool,
    ) -> LedgerResult<Vec<Payment>>;
}

/// Trait for implementing custom member validation rules
pub trait MemberValidator: Send + Sync {
    /// Validate a member before saving
    fn validate_member(&self, member: &Member) -> LedgerResult<()>;
}

/// Trait for implementing custom payment validation rules
pub trait PaymentValidator: Send + Sync {
    /// Validate a payment before saving
    fn validate_payment(&self, payment: &Payment) -> LedgerResult<()>;
}

/// Default member validator with basic rules
pub struct DefaultMemberValidator;

impl MemberValidator for DefaultMemberValidator {
    fn validate_member(&self, member: &Member) -> LedgerResult<()> {
        if member.id.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Member ID cannot be empty".to_string(),
            ));
        }

        if member.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Member name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default payment validator with basic rules
pub struct DefaultPaymentValidator;

impl PaymentValidator for DefaultPaymentValidator {
    fn validate_payment(&self, payment: &Payment) -> LedgerResult<()> {
        if payment.member_id.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Payment member ID cannot be empty".to_string(),
            ));
        }

        if payment.amount <= bigdecimal::BigDecimal::from(0) {
            return Err(LedgerError::Validation(
                "Payment amount must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
