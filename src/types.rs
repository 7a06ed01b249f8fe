//! Core types and data structures for the membership system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::reconciliation::AggregateDelta;

/// Payment classifications recognized by the ledger
///
/// Serialized snake_case to match the persisted column values
/// (`membership`, `monthly_dues`, `daily_dues`, `cbu`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// One-time membership fee; tracked via payment history only
    Membership,
    /// Recurring monthly dues; accrues on the member record
    MonthlyDues,
    /// Recurring daily dues; accrues on the member record
    DailyDues,
    /// Direct capital build-up contribution
    Cbu,
}

impl PaymentType {
    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Membership => "Membership Fee",
            PaymentType::MonthlyDues => "Monthly Dues",
            PaymentType::DailyDues => "Daily Dues",
            PaymentType::Cbu => "CBU",
        }
    }
}

/// Membership classification reference data
///
/// Looked up, never derived. The `name` is the sole discriminator for
/// CBU eligibility (see [`crate::reconciliation::CbuPolicy`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipType {
    /// Unique identifier for the membership type
    pub id: String,
    /// Classification name (e.g. "Tourist VISMIN", "UVE")
    pub name: String,
    /// Flat membership fee for this classification
    pub fee: BigDecimal,
    /// Capital build-up target amount for this classification
    pub cbu_target: BigDecimal,
    /// Display color tag
    pub color: String,
}

impl MembershipType {
    /// Create a new membership type
    pub fn new(
        id: String,
        name: String,
        fee: BigDecimal,
        cbu_target: BigDecimal,
        color: String,
    ) -> Self {
        Self {
            id,
            name,
            fee,
            cbu_target,
            color,
        }
    }
}

/// Member record with derived aggregate balances
///
/// The three aggregates (`cbu`, `monthly_dues`, `daily_dues`) are owned
/// exclusively by the reconciliation engine: each equals the summed effect
/// of all live payments for the member, clamped at zero where a delete-floor
/// clamp fired. Profile updates never touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier for the member
    pub id: String,
    /// Member's display name
    pub name: String,
    /// Reference to the member's membership type
    pub membership_type_id: String,
    /// Capital build-up balance
    pub cbu: BigDecimal,
    /// Cumulative monthly dues paid
    pub monthly_dues: BigDecimal,
    /// Cumulative daily dues paid
    pub daily_dues: BigDecimal,
    /// Date the member joined
    pub date_joined: NaiveDate,
    /// When the member record was created
    pub created_at: NaiveDateTime,
    /// When the member record was last updated
    pub updated_at: NaiveDateTime,
}

impl Member {
    /// Create a new member with zeroed aggregates
    pub fn new(
        id: String,
        name: String,
        membership_type_id: String,
        date_joined: NaiveDate,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name,
            membership_type_id,
            cbu: BigDecimal::from(0),
            monthly_dues: BigDecimal::from(0),
            daily_dues: BigDecimal::from(0),
            date_joined,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a relative aggregate delta to this member's balances
    ///
    /// With `clamp_at_zero`, each resulting aggregate is floored at zero
    /// (used on the soft-delete reversal path to absorb historical drift).
    pub fn apply_delta(&mut self, delta: &AggregateDelta, clamp_at_zero: bool) {
        let zero = BigDecimal::from(0);

        self.cbu += &delta.cbu;
        self.monthly_dues += &delta.monthly_dues;
        self.daily_dues += &delta.daily_dues;

        if clamp_at_zero {
            if self.cbu < zero {
                self.cbu = zero.clone();
            }
            if self.monthly_dues < zero {
                self.monthly_dues = zero.clone();
            }
            if self.daily_dues < zero {
                self.daily_dues = zero;
            }
        }
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// Payment ledger row
///
/// Soft-deleted payments stay on record for audit but are excluded from
/// history listings and aggregate computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for the payment
    pub id: String,
    /// Owning member
    pub member_id: String,
    /// Payment amount (positive)
    pub amount: BigDecimal,
    /// Classification deciding how the amount propagates into aggregates
    pub payment_type: PaymentType,
    /// Business date of the payment
    pub payment_date: NaiveDate,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// When the payment was recorded
    pub created_at: NaiveDateTime,
    /// Set when the payment was last edited
    pub edited_at: Option<NaiveDateTime>,
    /// Tombstone flag; a deleted payment is excluded from all computation
    pub is_deleted: bool,
    /// Set when the payment was soft-deleted
    pub deleted_at: Option<NaiveDateTime>,
}

impl Payment {
    /// Create a new payment with a generated id, dated today
    pub fn new(
        member_id: String,
        amount: BigDecimal,
        payment_type: PaymentType,
        notes: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            member_id,
            amount,
            payment_type,
            payment_date: now.date(),
            notes,
            created_at: now,
            edited_at: None,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Whether the payment still counts toward aggregates and history
    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }
}

/// Field updates for editing a payment
///
/// Unset fields keep their current values. The reversal step of an edit
/// always uses the original payment's type and amount.
#[derive(Debug, Clone, Default)]
pub struct PaymentUpdate {
    /// New amount, if changing
    pub amount: Option<BigDecimal>,
    /// New payment type, if changing
    pub payment_type: Option<PaymentType>,
    /// New business date, if changing
    pub payment_date: Option<NaiveDate>,
    /// New notes, if changing
    pub notes: Option<String>,
}

impl PaymentUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new amount
    pub fn amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set a new payment type
    pub fn payment_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = Some(payment_type);
        self
    }

    /// Set a new business date
    pub fn payment_date(mut self, payment_date: NaiveDate) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    /// Set new notes
    pub fn notes(mut self, notes: String) -> Self {
        self.notes = Some(notes);
        self
    }
}

/// Errors that can occur in the membership ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("Membership type not found: {0}")]
    MembershipTypeNotFound(String),
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),
    #[error("Payment already deleted: {0}")]
    PaymentDeleted(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
