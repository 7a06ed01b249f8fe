//! Dues/CBU reconciliation engine
//!
//! Decides how a payment amount propagates into a member's derived
//! aggregates (`cbu`, `monthly_dues`, `daily_dues`) and how edits and
//! soft-deletes reverse a prior propagation. The engine is pure: it turns
//! a payment event into an [`AggregateDelta`]; persisting that delta is the
//! storage layer's job.

use std::collections::HashSet;
use std::ops::{Add, Neg};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::PaymentType;

/// Membership-type names whose monthly dues also credit CBU, as of the
/// latest reference data. The set has changed before and will again, so
/// it is configuration on [`CbuPolicy`], not a literal inside the rules.
pub const DEFAULT_CBU_ELIGIBLE: [&str; 3] = ["Tourist VISMIN", "UVE", "PUJ Members"];

/// Configuration for CBU eligibility and aggregate column tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbuPolicy {
    /// Membership-type names whose monthly dues also credit CBU
    eligible_types: HashSet<String>,
    /// Whether the `monthly_dues`/`daily_dues` member columns accrue at all
    track_dues_totals: bool,
}

impl CbuPolicy {
    /// Create a policy with an explicit eligible-name set
    pub fn new<I, S>(eligible_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            eligible_types: eligible_types.into_iter().map(Into::into).collect(),
            track_dues_totals: true,
        }
    }

    /// Disable accrual of the dues total columns, leaving CBU tracking only
    pub fn without_dues_totals(mut self) -> Self {
        self.track_dues_totals = false;
        self
    }

    /// Whether a membership-type name is CBU-eligible
    pub fn is_eligible(&self, membership_type_name: &str) -> bool {
        self.eligible_types.contains(membership_type_name)
    }

    /// Whether the dues total columns accrue
    pub fn tracks_dues_totals(&self) -> bool {
        self.track_dues_totals
    }
}

impl Default for CbuPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CBU_ELIGIBLE)
    }
}

/// Relative change to a member's derived aggregates
///
/// Deltas form a vector: they negate and add fieldwise, which is what makes
/// an edit expressible as `reverse(old) + apply(new)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateDelta {
    /// Change to the capital build-up balance
    pub cbu: BigDecimal,
    /// Change to cumulative monthly dues
    pub monthly_dues: BigDecimal,
    /// Change to cumulative daily dues
    pub daily_dues: BigDecimal,
}

impl AggregateDelta {
    /// The zero delta
    pub fn zero() -> Self {
        Self {
            cbu: BigDecimal::from(0),
            monthly_dues: BigDecimal::from(0),
            daily_dues: BigDecimal::from(0),
        }
    }

    /// Whether every field is zero
    pub fn is_zero(&self) -> bool {
        let zero = BigDecimal::from(0);
        self.cbu == zero && self.monthly_dues == zero && self.daily_dues == zero
    }
}

impl Add for AggregateDelta {
    type Output = AggregateDelta;

    fn add(self, rhs: AggregateDelta) -> AggregateDelta {
        AggregateDelta {
            cbu: self.cbu + rhs.cbu,
            monthly_dues: self.monthly_dues + rhs.monthly_dues,
            daily_dues: self.daily_dues + rhs.daily_dues,
        }
    }
}

impl Neg for AggregateDelta {
    type Output = AggregateDelta;

    fn neg(self) -> AggregateDelta {
        AggregateDelta {
            cbu: -self.cbu,
            monthly_dues: -self.monthly_dues,
            daily_dues: -self.daily_dues,
        }
    }
}

/// The reconciliation rule engine
///
/// Propagation rules, per payment type:
///
/// | payment type   | effect                                                  |
/// |----------------|---------------------------------------------------------|
/// | `membership`   | none (fee tracked via payment history sums)             |
/// | `monthly_dues` | `monthly_dues += amount`; `cbu += amount` iff eligible  |
/// | `daily_dues`   | `daily_dues += amount`                                  |
/// | `cbu`          | `cbu += amount` unconditionally                         |
///
/// A payment for a member without a resolvable membership type is fee-only:
/// it produces the zero delta regardless of payment type.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    policy: CbuPolicy,
}

impl ReconciliationEngine {
    /// Create an engine with the given policy
    pub fn new(policy: CbuPolicy) -> Self {
        Self { policy }
    }

    /// The engine's policy
    pub fn policy(&self) -> &CbuPolicy {
        &self.policy
    }

    /// Delta produced by recording a payment
    pub fn apply(
        &self,
        membership_type_name: Option<&str>,
        payment_type: PaymentType,
        amount: &BigDecimal,
    ) -> AggregateDelta {
        let mut delta = AggregateDelta::zero();
        let Some(type_name) = membership_type_name else {
            return delta;
        };
        let eligible = self.policy.is_eligible(type_name);

        match payment_type {
            PaymentType::Membership => {}
            PaymentType::MonthlyDues => {
                if self.policy.track_dues_totals {
                    delta.monthly_dues = amount.clone();
                }
                if eligible {
                    delta.cbu = amount.clone();
                }
            }
            PaymentType::DailyDues => {
                if self.policy.track_dues_totals {
                    delta.daily_dues = amount.clone();
                }
            }
            PaymentType::Cbu => {
                delta.cbu = amount.clone();
            }
        }

        delta
    }

    /// Delta that undoes a prior propagation
    ///
    /// Exact algebraic inverse of [`apply`](Self::apply); must be computed
    /// from the original payment's type and amount, not the edited ones.
    pub fn reverse(
        &self,
        membership_type_name: Option<&str>,
        payment_type: PaymentType,
        amount: &BigDecimal,
    ) -> AggregateDelta {
        -self.apply(membership_type_name, payment_type, amount)
    }

    /// Combined delta for an edit: reverse the original effect, apply the new
    ///
    /// The two parts may cancel; callers may skip the member write when the
    /// result [`is_zero`](AggregateDelta::is_zero).
    pub fn edit_delta(
        &self,
        membership_type_name: Option<&str>,
        old_type: PaymentType,
        old_amount: &BigDecimal,
        new_type: PaymentType,
        new_amount: &BigDecimal,
    ) -> AggregateDelta {
        self.reverse(membership_type_name, old_type, old_amount)
            + self.apply(membership_type_name, new_type, new_amount)
    }
}
