//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::reconciliation::AggregateDelta;
use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    membership_types: Arc<RwLock<HashMap<String, MembershipType>>>,
    members: Arc<RwLock<HashMap<String, Member>>>,
    payments: Arc<RwLock<HashMap<String, Payment>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            membership_types: Arc::new(RwLock::new(HashMap::new())),
            members: Arc::new(RwLock::new(HashMap::new())),
            payments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.membership_types.write().unwrap().clear();
        self.members.write().unwrap().clear();
        self.payments.write().unwrap().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipStorage for MemoryStorage {
    async fn save_membership_type(
        &mut self,
        membership_type: &MembershipType,
    ) -> LedgerResult<()> {
        self.membership_types
            .write()
            .unwrap()
            .insert(membership_type.id.clone(), membership_type.clone());
        Ok(())
    }

    async fn get_membership_type(&self, type_id: &str) -> LedgerResult<Option<MembershipType>> {
        Ok(self.membership_types.read().unwrap().get(type_id).cloned())
    }

    async fn list_membership_types(&self) -> LedgerResult<Vec<MembershipType>> {
        let mut types: Vec<MembershipType> = self
            .membership_types
            .read()
            .unwrap()
            .values()
            .cloned()
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn save_member(&mut self, member: &Member) -> LedgerResult<()> {
        self.members
            .write()
            .unwrap()
            .insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn get_member(&self, member_id: &str) -> LedgerResult<Option<Member>> {
        Ok(self.members.read().unwrap().get(member_id).cloned())
    }

    async fn list_members(&self, membership_type_id: Option<&str>) -> LedgerResult<Vec<Member>> {
        let members = self.members.read().unwrap();
        let mut filtered: Vec<Member> = members
            .values()
            .filter(|member| {
                membership_type_id.is_none_or(|t| member.membership_type_id == t)
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(filtered)
    }

    async fn update_member(&mut self, member: &Member) -> LedgerResult<()> {
        if self.members.read().unwrap().contains_key(&member.id) {
            self.members
                .write()
                .unwrap()
                .insert(member.id.clone(), member.clone());
            Ok(())
        } else {
            Err(LedgerError::MemberNotFound(member.id.clone()))
        }
    }

    async fn delete_member(&mut self, member_id: &str) -> LedgerResult<()> {
        if self.members.write().unwrap().remove(member_id).is_some() {
            Ok(())
        } else {
            Err(LedgerError::MemberNotFound(member_id.to_string()))
        }
    }

    async fn apply_member_delta(
        &mut self,
        member_id: &str,
        delta: &AggregateDelta,
        clamp_at_zero: bool,
    ) -> LedgerResult<Member> {
        // One write lock for the whole read-modify-write keeps the delta
        // atomic with respect to other callers of this storage.
        let mut members = self.members.write().unwrap();
        let member = members
            .get_mut(member_id)
            .ok_or_else(|| LedgerError::MemberNotFound(member_id.to_string()))?;

        member.apply_delta(delta, clamp_at_zero);
        Ok(member.clone())
    }

    async fn save_payment(&mut self, payment: &Payment) -> LedgerResult<()> {
        self.payments
            .write()
            .unwrap()
            .insert(payment.id.clone(), payment.clone());
        Ok(())
    }

    async fn get_payment(&self, payment_id: &str) -> LedgerResult<Option<Payment>> {
        Ok(self.payments.read().unwrap().get(payment_id).cloned())
    }

    async fn update_payment(&mut self, payment: &Payment) -> LedgerResult<()> {
        if self.payments.read().unwrap().contains_key(&payment.id) {
            self.payments
                .write()
                .unwrap()
                .insert(payment.id.clone(), payment.clone());
            Ok(())
        } else {
            Err(LedgerError::PaymentNotFound(payment.id.clone()))
        }
    }

    async fn list_member_payments(
        &self,
        member_id: &str,
        include_deleted: bool,
    ) -> LedgerResult<Vec<Payment>> {
        let payments = self.payments.read().unwrap();
        let mut filtered: Vec<Payment> = payments
            .values()
            .filter(|payment| payment.member_id == member_id)
            .filter(|payment| include_deleted || payment.is_live())
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(filtered)
    }
}
