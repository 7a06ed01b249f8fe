//! Member management functionality

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::traits::*;
use crate::types::*;

/// Input for creating a member
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    /// Member's display name
    pub name: String,
    /// Membership type the member enrolls under
    pub membership_type_id: String,
    /// Join date; defaults to today
    pub date_joined: Option<NaiveDate>,
    /// Opening CBU balance carried in from prior records
    pub cbu: Option<BigDecimal>,
    /// Opening monthly dues total carried in from prior records
    pub monthly_dues: Option<BigDecimal>,
    /// Opening daily dues total carried in from prior records
    pub daily_dues: Option<BigDecimal>,
    /// Membership-fee payment to record alongside enrollment
    pub initial_payment: Option<BigDecimal>,
}

/// Profile updates for a member
///
/// Aggregates are deliberately absent: they are mutated only by the
/// payment transitions.
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    /// New display name, if changing
    pub name: Option<String>,
    /// New membership type, if changing
    pub membership_type_id: Option<String>,
    /// New join date, if changing
    pub date_joined: Option<NaiveDate>,
}

/// Member manager for enrollment and profile operations
pub struct MemberManager<S: MembershipStorage> {
    pub(crate) storage: S,
    validator: Box<dyn MemberValidator>,
}

impl<S: MembershipStorage> MemberManager<S> {
    /// Create a new member manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultMemberValidator),
        }
    }

    /// Create a new member manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn MemberValidator>) -> Self {
        Self { storage, validator }
    }

    /// Enroll a new member
    ///
    /// The referenced membership type must exist. Opening aggregate values
    /// (carried in from records predating the ledger) seed the member row;
    /// they default to zero. The `initial_payment` field is handled by the
    /// ledger facade, not here.
    pub async fn create_member(&mut self, new_member: &NewMember) -> LedgerResult<Member> {
        if self
            .storage
            .get_membership_type(&new_member.membership_type_id)
            .await?
            .is_none()
        {
            return Err(LedgerError::MembershipTypeNotFound(
                new_member.membership_type_id.clone(),
            ));
        }

        let date_joined = new_member
            .date_joined
            .unwrap_or_else(|| chrono::Utc::now().naive_utc().date());

        let mut member = Member::new(
            uuid::Uuid::new_v4().to_string(),
            new_member.name.clone(),
            new_member.membership_type_id.clone(),
            date_joined,
        );

        if let Some(cbu) = &new_member.cbu {
            member.cbu = cbu.clone();
        }
        if let Some(monthly_dues) = &new_member.monthly_dues {
            member.monthly_dues = monthly_dues.clone();
        }
        if let Some(daily_dues) = &new_member.daily_dues {
            member.daily_dues = daily_dues.clone();
        }

        self.validator.validate_member(&member)?;
        self.storage.save_member(&member).await?;

        Ok(member)
    }

    /// Get a member by ID
    pub async fn get_member(&self, member_id: &str) -> LedgerResult<Option<Member>> {
        self.storage.get_member(member_id).await
    }

    /// Get a member by ID, returning an error if not found
    pub async fn get_member_required(&self, member_id: &str) -> LedgerResult<Member> {
        self.storage
            .get_member(member_id)
            .await?
            .ok_or_else(|| LedgerError::MemberNotFound(member_id.to_string()))
    }

    /// List all members, ordered by name
    pub async fn list_members(&self) -> LedgerResult<Vec<Member>> {
        self.storage.list_members(None).await
    }

    /// List members of a membership type, ordered by name
    pub async fn list_members_by_type(
        &self,
        membership_type_id: &str,
    ) -> LedgerResult<Vec<Member>> {
        self.storage.list_members(Some(membership_type_id)).await
    }

    /// Count members of a membership type
    pub async fn member_count_by_type(&self, membership_type_id: &str) -> LedgerResult<usize> {
        Ok(self.list_members_by_type(membership_type_id).await?.len())
    }

    /// Update a member's profile fields
    ///
    /// Only name, membership type, and join date are reachable through this
    /// path; a changed membership type must exist.
    pub async fn update_member(
        &mut self,
        member_id: &str,
        updates: &MemberUpdate,
    ) -> LedgerResult<Member> {
        let mut member = self.get_member_required(member_id).await?;

        if let Some(name) = &updates.name {
            member.name = name.clone();
        }
        if let Some(type_id) = &updates.membership_type_id {
            if self.storage.get_membership_type(type_id).await?.is_none() {
                return Err(LedgerError::MembershipTypeNotFound(type_id.clone()));
            }
            member.membership_type_id = type_id.clone();
        }
        if let Some(date_joined) = updates.date_joined {
            member.date_joined = date_joined;
        }
        member.updated_at = chrono::Utc::now().naive_utc();

        self.validator.validate_member(&member)?;
        self.storage.update_member(&member).await?;

        Ok(member)
    }

    /// Delete a member
    ///
    /// Hard delete; the member's payment rows are the backend's concern.
    pub async fn delete_member(&mut self, member_id: &str) -> LedgerResult<()> {
        if self.storage.get_member(member_id).await?.is_none() {
            return Err(LedgerError::MemberNotFound(member_id.to_string()));
        }

        self.storage.delete_member(member_id).await
    }

    /// Register a membership type
    pub async fn save_membership_type(
        &mut self,
        membership_type: &MembershipType,
    ) -> LedgerResult<()> {
        self.storage.save_membership_type(membership_type).await
    }

    /// Get a membership type by ID
    pub async fn get_membership_type(
        &self,
        type_id: &str,
    ) -> LedgerResult<Option<MembershipType>> {
        self.storage.get_membership_type(type_id).await
    }

    /// List all membership types, ordered by name
    pub async fn list_membership_types(&self) -> LedgerResult<Vec<MembershipType>> {
        self.storage.list_membership_types().await
    }
}
