//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(LedgerError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a member name is valid
pub fn validate_member_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Member name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Member name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a record ID is valid
pub fn validate_record_id(id: &str) -> LedgerResult<()> {
    if id.trim().is_empty() {
        return Err(LedgerError::Validation("ID cannot be empty".to_string()));
    }

    if id.len() > 64 {
        return Err(LedgerError::Validation(
            "ID cannot exceed 64 characters".to_string(),
        ));
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(LedgerError::Validation(
            "ID can only contain alphanumeric characters, dashes, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Validate that payment notes are within bounds
pub fn validate_payment_notes(notes: &str) -> LedgerResult<()> {
    if notes.len() > 500 {
        return Err(LedgerError::Validation(
            "Payment notes cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced payment validator with detailed checks
pub struct EnhancedPaymentValidator;

impl PaymentValidator for EnhancedPaymentValidator {
    fn validate_payment(&self, payment: &Payment) -> LedgerResult<()> {
        validate_record_id(&payment.id)?;
        validate_record_id(&payment.member_id)?;
        validate_positive_amount(&payment.amount)?;

        if let Some(notes) = &payment.notes {
            validate_payment_notes(notes)?;
        }

        Ok(())
    }
}

/// Enhanced member validator with detailed checks
pub struct EnhancedMemberValidator;

impl MemberValidator for EnhancedMemberValidator {
    fn validate_member(&self, member: &Member) -> LedgerResult<()> {
        validate_record_id(&member.id)?;
        validate_member_name(&member.name)?;
        validate_record_id(&member.membership_type_id)?;

        Ok(())
    }
}
