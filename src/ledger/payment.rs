//! Payment transitions: record, edit, and soft-delete
//!
//! These are the only paths that mutate member aggregates. Each transition
//! writes the payment row first, then issues the aggregate change as a
//! relative delta for the backend to apply atomically. A failure between
//! the two writes is surfaced to the caller and not rolled back; backends
//! wanting atomicity can wrap both writes in one transaction behind
//! [`MembershipStorage`].

use bigdecimal::BigDecimal;

use crate::reconciliation::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// Payment manager driving the reconciliation engine against storage
pub struct PaymentManager<S: MembershipStorage> {
    storage: S,
    engine: ReconciliationEngine,
    validator: Box<dyn PaymentValidator>,
}

impl<S: MembershipStorage> PaymentManager<S> {
    /// Create a new payment manager with the given engine
    pub fn new(storage: S, engine: ReconciliationEngine) -> Self {
        Self {
            storage,
            engine,
            validator: Box::new(DefaultPaymentValidator),
        }
    }

    /// Create a new payment manager with custom validator
    pub fn with_validator(
        storage: S,
        engine: ReconciliationEngine,
        validator: Box<dyn PaymentValidator>,
    ) -> Self {
        Self {
            storage,
            engine,
            validator,
        }
    }

    /// The reconciliation engine in use
    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    /// Resolve the member's membership-type name, if any
    ///
    /// A member without a resolvable membership type is accepted fee-only:
    /// the payment is recorded but no aggregate update occurs.
    async fn membership_type_name(&self, member: &Member) -> LedgerResult<Option<String>> {
        Ok(self
            .storage
            .get_membership_type(&member.membership_type_id)
            .await?
            .map(|t| t.name))
    }

    /// Record a new payment for a member
    pub async fn record_payment(
        &mut self,
        member_id: &str,
        amount: BigDecimal,
        payment_type: PaymentType,
        notes: Option<String>,
    ) -> LedgerResult<Payment> {
        let member = self
            .storage
            .get_member(member_id)
            .await?
            .ok_or_else(|| LedgerError::MemberNotFound(member_id.to_string()))?;

        let payment = Payment::new(member_id.to_string(), amount, payment_type, notes);
        self.validator.validate_payment(&payment)?;

        self.storage.save_payment(&payment).await?;

        let type_name = self.membership_type_name(&member).await?;
        let delta = self
            .engine
            .apply(type_name.as_deref(), payment_type, &payment.amount);

        if !delta.is_zero() {
            self.storage
                .apply_member_delta(member_id, &delta, false)
                .await?;
        }

        Ok(payment)
    }

    /// Edit a payment's amount, type, date, or notes
    ///
    /// The original effect is reversed using the original type and amount,
    /// the new effect applied, and the combined delta written as one member
    /// update. A net-zero delta skips the member write.
    pub async fn edit_payment(
        &mut self,
        payment_id: &str,
        updates: &PaymentUpdate,
    ) -> LedgerResult<Payment> {
        let original = self
            .storage
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| LedgerError::PaymentNotFound(payment_id.to_string()))?;

        if original.is_deleted {
            return Err(LedgerError::PaymentDeleted(payment_id.to_string()));
        }

        let member = self
            .storage
            .get_member(&original.member_id)
            .await?
            .ok_or_else(|| LedgerError::MemberNotFound(original.member_id.clone()))?;

        let new_amount = updates.amount.clone().unwrap_or_else(|| original.amount.clone());
        let new_type = updates.payment_type.unwrap_or(original.payment_type);

        let mut updated = original.clone();
        updated.amount = new_amount.clone();
        updated.payment_type = new_type;
        if let Some(payment_date) = updates.payment_date {
            updated.payment_date = payment_date;
        }
        if let Some(notes) = &updates.notes {
            updated.notes = Some(notes.clone());
        }
        updated.edited_at = Some(chrono::Utc::now().naive_utc());

        self.validator.validate_payment(&updated)?;
        self.storage.update_payment(&updated).await?;

        let type_name = self.membership_type_name(&member).await?;
        let delta = self.engine.edit_delta(
            type_name.as_deref(),
            original.payment_type,
            &original.amount,
            new_type,
            &new_amount,
        );

        if !delta.is_zero() {
            self.storage
                .apply_member_delta(&original.member_id, &delta, false)
                .await?;
        }

        Ok(updated)
    }

    /// Soft-delete a payment, reversing its effect on the member
    ///
    /// A second delete is rejected as [`LedgerError::PaymentDeleted`], never
    /// reversed twice. Every aggregate resulting from the reversal is floored
    /// at zero to absorb drift from historical data.
    pub async fn delete_payment(&mut self, payment_id: &str) -> LedgerResult<Payment> {
        let payment = self
            .storage
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| LedgerError::PaymentNotFound(payment_id.to_string()))?;

        if payment.is_deleted {
            return Err(LedgerError::PaymentDeleted(payment_id.to_string()));
        }

        let member = self
            .storage
            .get_member(&payment.member_id)
            .await?
            .ok_or_else(|| LedgerError::MemberNotFound(payment.member_id.clone()))?;

        let mut tombstoned = payment.clone();
        tombstoned.is_deleted = true;
        tombstoned.deleted_at = Some(chrono::Utc::now().naive_utc());
        self.storage.update_payment(&tombstoned).await?;

        let type_name = self.membership_type_name(&member).await?;
        let delta = self
            .engine
            .reverse(type_name.as_deref(), payment.payment_type, &payment.amount);

        if !delta.is_zero() {
            self.storage
                .apply_member_delta(&payment.member_id, &delta, true)
                .await?;
        }

        Ok(tombstoned)
    }

    /// Get a payment by ID (tombstoned rows included)
    pub async fn get_payment(&self, payment_id: &str) -> LedgerResult<Option<Payment>> {
        self.storage.get_payment(payment_id).await
    }

    /// A member's live payments, newest first
    pub async fn payment_history(&self, member_id: &str) -> LedgerResult<Vec<Payment>> {
        self.storage.list_member_payments(member_id, false).await
    }
}
