//! Main ledger facade that coordinates members and payments

use bigdecimal::BigDecimal;

use crate::ledger::{MemberManager, MemberUpdate, NewMember, PaymentManager};
use crate::reconciliation::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// Membership ledger coordinating enrollment and payment reconciliation
pub struct MembershipLedger<S: MembershipStorage> {
    member_manager: MemberManager<S>,
    payment_manager: PaymentManager<S>,
}

impl<S: MembershipStorage + Clone> MembershipLedger<S> {
    /// Create a ledger with the default reconciliation policy
    pub fn new(storage: S) -> Self {
        Self::with_engine(storage, ReconciliationEngine::default())
    }

    /// Create a ledger with a custom reconciliation engine
    pub fn with_engine(storage: S, engine: ReconciliationEngine) -> Self {
        Self {
            member_manager: MemberManager::new(storage.clone()),
            payment_manager: PaymentManager::new(storage, engine),
        }
    }

    /// Create a ledger with custom validators
    pub fn with_validators(
        storage: S,
        engine: ReconciliationEngine,
        member_validator: Box<dyn MemberValidator>,
        payment_validator: Box<dyn PaymentValidator>,
    ) -> Self {
        Self {
            member_manager: MemberManager::with_validator(storage.clone(), member_validator),
            payment_manager: PaymentManager::with_validator(storage, engine, payment_validator),
        }
    }

    /// The reconciliation engine in use
    pub fn engine(&self) -> &ReconciliationEngine {
        self.payment_manager.engine()
    }

    // Membership type operations
    /// Register a membership type
    pub async fn save_membership_type(
        &mut self,
        membership_type: &MembershipType,
    ) -> LedgerResult<()> {
        self.member_manager.save_membership_type(membership_type).await
    }

    /// Get a membership type by ID
    pub async fn get_membership_type(
        &self,
        type_id: &str,
    ) -> LedgerResult<Option<MembershipType>> {
        self.member_manager.get_membership_type(type_id).await
    }

    /// List all membership types, ordered by name
    pub async fn list_membership_types(&self) -> LedgerResult<Vec<MembershipType>> {
        self.member_manager.list_membership_types().await
    }

    // Member operations
    /// Enroll a new member, recording the initial membership-fee payment
    /// when one is given
    pub async fn add_member(&mut self, new_member: &NewMember) -> LedgerResult<Member> {
        let member = self.member_manager.create_member(new_member).await?;

        if let Some(initial_payment) = &new_member.initial_payment {
            if *initial_payment > BigDecimal::from(0) {
                self.payment_manager
                    .record_payment(
                        &member.id,
                        initial_payment.clone(),
                        PaymentType::Membership,
                        Some("Initial payment".to_string()),
                    )
                    .await?;
            }
        }

        Ok(member)
    }

    /// Get a member by ID
    pub async fn get_member(&self, member_id: &str) -> LedgerResult<Option<Member>> {
        self.member_manager.get_member(member_id).await
    }

    /// Get a member by ID, returning an error if not found
    pub async fn get_member_required(&self, member_id: &str) -> LedgerResult<Member> {
        self.member_manager.get_member_required(member_id).await
    }

    /// List all members, ordered by name
    pub async fn list_members(&self) -> LedgerResult<Vec<Member>> {
        self.member_manager.list_members().await
    }

    /// List members of a membership type
    pub async fn list_members_by_type(
        &self,
        membership_type_id: &str,
    ) -> LedgerResult<Vec<Member>> {
        self.member_manager
            .list_members_by_type(membership_type_id)
            .await
    }

    /// Count members of a membership type
    pub async fn member_count_by_type(&self, membership_type_id: &str) -> LedgerResult<usize> {
        self.member_manager
            .member_count_by_type(membership_type_id)
            .await
    }

    /// Update a member's profile fields
    pub async fn update_member(
        &mut self,
        member_id: &str,
        updates: &MemberUpdate,
    ) -> LedgerResult<Member> {
        self.member_manager.update_member(member_id, updates).await
    }

    /// Delete a member
    pub async fn delete_member(&mut self, member_id: &str) -> LedgerResult<()> {
        self.member_manager.delete_member(member_id).await
    }

    // Payment transitions
    /// Record a new payment for a member
    pub async fn record_payment(
        &mut self,
        member_id: &str,
        amount: BigDecimal,
        payment_type: PaymentType,
        notes: Option<String>,
    ) -> LedgerResult<Payment> {
        self.payment_manager
            .record_payment(member_id, amount, payment_type, notes)
            .await
    }

    /// Edit a payment, reconciling the member's aggregates
    pub async fn edit_payment(
        &mut self,
        payment_id: &str,
        updates: &PaymentUpdate,
    ) -> LedgerResult<Payment> {
        self.payment_manager.edit_payment(payment_id, updates).await
    }

    /// Soft-delete a payment, reversing its effect on the member
    pub async fn delete_payment(&mut self, payment_id: &str) -> LedgerResult<Payment> {
        self.payment_manager.delete_payment(payment_id).await
    }

    /// Get a payment by ID (tombstoned rows included)
    pub async fn get_payment(&self, payment_id: &str) -> LedgerResult<Option<Payment>> {
        self.payment_manager.get_payment(payment_id).await
    }

    /// A member's live payments, newest first
    pub async fn payment_history(&self, member_id: &str) -> LedgerResult<Vec<Payment>> {
        self.payment_manager.payment_history(member_id).await
    }
}
