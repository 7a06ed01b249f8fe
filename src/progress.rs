//! Read-side progress indicators
//!
//! Derived views over a member and their live payments: membership-fee
//! progress and capital build-up progress toward the type's target. These
//! are computed on demand and never stored.

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::types::{Member, MembershipType, Payment, PaymentType};

/// Membership-fee payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeStatus {
    /// Fee fully paid
    Full,
    /// Fee partially paid
    Partial,
}

/// Capital build-up status against the type's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbuStatus {
    /// Target reached
    Complete,
    /// Still accruing toward the target
    InProgress,
}

/// Fee progress with a rounded display percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeProgress {
    pub status: FeeStatus,
    pub percentage: u8,
}

/// CBU progress with a rounded display percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbuProgress {
    pub status: CbuStatus,
    pub percentage: u8,
}

/// Sum of live payment amounts, optionally restricted to one payment type
///
/// Tombstoned payments never count.
pub fn total_paid(payments: &[Payment], payment_type: Option<PaymentType>) -> BigDecimal {
    payments
        .iter()
        .filter(|p| p.is_live())
        .filter(|p| payment_type.is_none_or(|t| p.payment_type == t))
        .map(|p| &p.amount)
        .sum()
}

/// Outstanding membership fee, floored at zero
pub fn outstanding_fee(membership_type: &MembershipType, payments: &[Payment]) -> BigDecimal {
    let paid = total_paid(payments, Some(PaymentType::Membership));
    let balance = &membership_type.fee - paid;
    balance.max(BigDecimal::from(0))
}

/// Membership-fee progress for display
pub fn fee_progress(membership_type: &MembershipType, payments: &[Payment]) -> FeeProgress {
    let paid = total_paid(payments, Some(PaymentType::Membership));

    if paid >= membership_type.fee {
        FeeProgress {
            status: FeeStatus::Full,
            percentage: 100,
        }
    } else {
        FeeProgress {
            status: FeeStatus::Partial,
            percentage: rounded_percentage(&paid, &membership_type.fee),
        }
    }
}

/// Amount still needed to reach the CBU target, floored at zero
pub fn cbu_remaining(member: &Member, membership_type: &MembershipType) -> BigDecimal {
    let remaining = &membership_type.cbu_target - &member.cbu;
    remaining.max(BigDecimal::from(0))
}

/// Capital build-up progress for display
pub fn cbu_progress(member: &Member, membership_type: &MembershipType) -> CbuProgress {
    if member.cbu >= membership_type.cbu_target {
        CbuProgress {
            status: CbuStatus::Complete,
            percentage: 100,
        }
    } else {
        CbuProgress {
            status: CbuStatus::InProgress,
            percentage: rounded_percentage(&member.cbu, &membership_type.cbu_target),
        }
    }
}

fn rounded_percentage(part: &BigDecimal, whole: &BigDecimal) -> u8 {
    if *whole <= BigDecimal::from(0) {
        return 0;
    }
    let ratio = (part / whole).to_f64().unwrap_or(0.0);
    (ratio * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uve_type() -> MembershipType {
        MembershipType::new(
            "uve".to_string(),
            "UVE".to_string(),
            BigDecimal::from(1500),
            BigDecimal::from(10000),
            "primary".to_string(),
        )
    }

    fn fee_payment(amount: i64) -> Payment {
        Payment::new(
            "m1".to_string(),
            BigDecimal::from(amount),
            PaymentType::Membership,
            None,
        )
    }

    #[test]
    fn total_paid_excludes_tombstoned_payments() {
        let mut deleted = fee_payment(500);
        deleted.is_deleted = true;
        let payments = vec![fee_payment(1000), deleted];

        assert_eq!(
            total_paid(&payments, Some(PaymentType::Membership)),
            BigDecimal::from(1000)
        );
    }

    #[test]
    fn fee_progress_partial_and_full() {
        let t = uve_type();

        let progress = fee_progress(&t, &[fee_payment(750)]);
        assert_eq!(progress.status, FeeStatus::Partial);
        assert_eq!(progress.percentage, 50);

        let progress = fee_progress(&t, &[fee_payment(1500)]);
        assert_eq!(progress.status, FeeStatus::Full);
        assert_eq!(progress.percentage, 100);
    }

    #[test]
    fn outstanding_fee_floors_at_zero() {
        let t = uve_type();
        assert_eq!(outstanding_fee(&t, &[fee_payment(2000)]), BigDecimal::from(0));
        assert_eq!(outstanding_fee(&t, &[fee_payment(500)]), BigDecimal::from(1000));
    }

    #[test]
    fn cbu_progress_tracks_target() {
        let t = uve_type();
        let mut member = Member::new(
            "m1".to_string(),
            "Elena".to_string(),
            "uve".to_string(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        member.cbu = BigDecimal::from(2500);

        let progress = cbu_progress(&member, &t);
        assert_eq!(progress.status, CbuStatus::InProgress);
        assert_eq!(progress.percentage, 25);
        assert_eq!(cbu_remaining(&member, &t), BigDecimal::from(7500));

        member.cbu = BigDecimal::from(10000);
        let progress = cbu_progress(&member, &t);
        assert_eq!(progress.status, CbuStatus::Complete);
    }

    #[test]
    fn zero_requirements_report_zero_percentage() {
        let t = MembershipType::new(
            "free".to_string(),
            "Honorary".to_string(),
            BigDecimal::from(0),
            BigDecimal::from(0),
            "grey".to_string(),
        );
        let member = Member::new(
            "m1".to_string(),
            "Elena".to_string(),
            "free".to_string(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        // fee of zero counts as fully paid
        assert_eq!(fee_progress(&t, &[]).status, FeeStatus::Full);
        assert_eq!(cbu_progress(&member, &t).status, CbuStatus::Complete);
    }
}
