//! Integration tests for membership-core

use bigdecimal::BigDecimal;
use membership_core::{
    progress,
    utils::{EnhancedMemberValidator, EnhancedPaymentValidator, MemoryStorage},
    CbuPolicy, LedgerError, Member, MembershipLedger, MembershipStorage, MembershipType,
    NewMember, Payment, PaymentType, PaymentUpdate, ReconciliationEngine,
};

async fn ledger_with_types(storage: MemoryStorage) -> MembershipLedger<MemoryStorage> {
    let mut ledger = MembershipLedger::new(storage);

    ledger
        .save_membership_type(&MembershipType::new(
            "uve".to_string(),
            "UVE".to_string(),
            BigDecimal::from(1500),
            BigDecimal::from(10000),
            "primary".to_string(),
        ))
        .await
        .unwrap();

    ledger
        .save_membership_type(&MembershipType::new(
            "regular".to_string(),
            "Regular".to_string(),
            BigDecimal::from(1000),
            BigDecimal::from(0),
            "secondary".to_string(),
        ))
        .await
        .unwrap();

    ledger
}

async fn enroll(ledger: &mut MembershipLedger<MemoryStorage>, name: &str, type_id: &str) -> String {
    ledger
        .add_member(&NewMember {
            name: name.to_string(),
            membership_type_id: type_id.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

/// Scenarios A through C: create, edit, then soft-delete a monthly dues
/// payment for a CBU-eligible member, checking aggregates at each step.
#[tokio::test]
async fn test_eligible_monthly_dues_lifecycle() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;
    let member_id = enroll(&mut ledger, "Elena Reyes", "uve").await;

    // Scenario A: create
    let payment = ledger
        .record_payment(&member_id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();

    let member = ledger.get_member_required(&member_id).await.unwrap();
    assert_eq!(member.monthly_dues, BigDecimal::from(500));
    assert_eq!(member.cbu, BigDecimal::from(500));

    // Scenario B: edit the amount down to 300
    ledger
        .edit_payment(&payment.id, &PaymentUpdate::new().amount(BigDecimal::from(300)))
        .await
        .unwrap();

    let member = ledger.get_member_required(&member_id).await.unwrap();
    assert_eq!(member.monthly_dues, BigDecimal::from(300));
    assert_eq!(member.cbu, BigDecimal::from(300));

    // Scenario C: soft-delete
    let tombstoned = ledger.delete_payment(&payment.id).await.unwrap();
    assert!(tombstoned.is_deleted);
    assert!(tombstoned.deleted_at.is_some());

    let member = ledger.get_member_required(&member_id).await.unwrap();
    assert_eq!(member.monthly_dues, BigDecimal::from(0));
    assert_eq!(member.cbu, BigDecimal::from(0));

    // The tombstone is retained but out of history
    assert!(ledger.get_payment(&payment.id).await.unwrap().is_some());
    assert!(ledger.payment_history(&member_id).await.unwrap().is_empty());
}

/// Scenario D: monthly dues for a non-eligible type never touch CBU.
#[tokio::test]
async fn test_ineligible_monthly_dues_skip_cbu() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;
    let member_id = enroll(&mut ledger, "Marco Cruz", "regular").await;

    ledger
        .record_payment(&member_id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();

    let member = ledger.get_member_required(&member_id).await.unwrap();
    assert_eq!(member.monthly_dues, BigDecimal::from(500));
    assert_eq!(member.cbu, BigDecimal::from(0));
}

/// Scenario E: deleting a payment larger than the current balance clamps
/// the aggregate at zero instead of going negative.
#[tokio::test]
async fn test_delete_clamps_aggregates_at_zero() {
    let mut storage = MemoryStorage::new();

    // Seed inconsistent historical data directly in storage: a live CBU
    // payment of 300 against a member whose recorded balance is only 100.
    storage
        .save_membership_type(&MembershipType::new(
            "regular".to_string(),
            "Regular".to_string(),
            BigDecimal::from(1000),
            BigDecimal::from(0),
            "secondary".to_string(),
        ))
        .await
        .unwrap();

    let mut member = Member::new(
        "p1".to_string(),
        "Paolo Santos".to_string(),
        "regular".to_string(),
        chrono::NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    );
    member.cbu = BigDecimal::from(100);
    storage.save_member(&member).await.unwrap();

    let payment = Payment::new(
        "p1".to_string(),
        BigDecimal::from(300),
        PaymentType::Cbu,
        None,
    );
    let payment_id = payment.id.clone();
    storage.save_payment(&payment).await.unwrap();

    let mut ledger = MembershipLedger::new(storage);
    ledger.delete_payment(&payment_id).await.unwrap();

    // Clamped to 0, not -200
    let member = ledger.get_member_required("p1").await.unwrap();
    assert_eq!(member.cbu, BigDecimal::from(0));
}

/// Editing a payment to its own current values produces no aggregate change.
#[tokio::test]
async fn test_edit_to_same_values_is_net_zero() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;
    let member_id = enroll(&mut ledger, "Elena Reyes", "uve").await;

    let payment = ledger
        .record_payment(&member_id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();

    let before = ledger.get_member_required(&member_id).await.unwrap();

    let edited = ledger
        .edit_payment(
            &payment.id,
            &PaymentUpdate::new()
                .amount(BigDecimal::from(500))
                .payment_type(PaymentType::MonthlyDues),
        )
        .await
        .unwrap();
    assert!(edited.edited_at.is_some());

    let after = ledger.get_member_required(&member_id).await.unwrap();
    assert_eq!(before.cbu, after.cbu);
    assert_eq!(before.monthly_dues, after.monthly_dues);
    assert_eq!(before.daily_dues, after.daily_dues);
}

/// Tombstoned payments cannot be edited or deleted again.
#[tokio::test]
async fn test_tombstoned_payment_rejects_further_transitions() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;
    let member_id = enroll(&mut ledger, "Elena Reyes", "uve").await;

    let payment = ledger
        .record_payment(&member_id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();
    ledger.delete_payment(&payment.id).await.unwrap();

    let second_delete = ledger.delete_payment(&payment.id).await;
    assert!(matches!(second_delete, Err(LedgerError::PaymentDeleted(_))));

    let edit_attempt = ledger
        .edit_payment(&payment.id, &PaymentUpdate::new().amount(BigDecimal::from(100)))
        .await;
    assert!(matches!(edit_attempt, Err(LedgerError::PaymentDeleted(_))));

    // Aggregates were reversed exactly once
    let member = ledger.get_member_required(&member_id).await.unwrap();
    assert_eq!(member.cbu, BigDecimal::from(0));
    assert_eq!(member.monthly_dues, BigDecimal::from(0));
}

/// After an arbitrary sequence of transitions, each aggregate equals the
/// summed effect of live payments.
#[tokio::test]
async fn test_aggregates_match_live_payment_sums() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;
    let member_id = enroll(&mut ledger, "Elena Reyes", "uve").await;

    let p1 = ledger
        .record_payment(&member_id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();
    let p2 = ledger
        .record_payment(&member_id, BigDecimal::from(50), PaymentType::DailyDues, None)
        .await
        .unwrap();
    ledger
        .record_payment(&member_id, BigDecimal::from(200), PaymentType::Cbu, None)
        .await
        .unwrap();
    ledger
        .record_payment(&member_id, BigDecimal::from(1500), PaymentType::Membership, None)
        .await
        .unwrap();

    ledger
        .edit_payment(&p1.id, &PaymentUpdate::new().amount(BigDecimal::from(400)))
        .await
        .unwrap();
    ledger.delete_payment(&p2.id).await.unwrap();

    let member = ledger.get_member_required(&member_id).await.unwrap();
    let history = ledger.payment_history(&member_id).await.unwrap();

    let monthly_sum = progress::total_paid(&history, Some(PaymentType::MonthlyDues));
    let daily_sum = progress::total_paid(&history, Some(PaymentType::DailyDues));
    let cbu_direct = progress::total_paid(&history, Some(PaymentType::Cbu));

    assert_eq!(member.monthly_dues, monthly_sum);
    assert_eq!(member.daily_dues, daily_sum);
    // UVE is CBU-eligible: cbu = direct cbu payments + monthly dues
    assert_eq!(member.cbu, cbu_direct + monthly_sum);
}

/// The CBU allow-list is injected configuration, not a hardcoded literal.
#[tokio::test]
async fn test_cbu_policy_is_injectable() {
    let storage = MemoryStorage::new();
    let engine = ReconciliationEngine::new(CbuPolicy::new(["Regular"]));
    let mut ledger = MembershipLedger::with_engine(storage, engine);

    ledger
        .save_membership_type(&MembershipType::new(
            "regular".to_string(),
            "Regular".to_string(),
            BigDecimal::from(1000),
            BigDecimal::from(5000),
            "secondary".to_string(),
        ))
        .await
        .unwrap();

    let member_id = enroll(&mut ledger, "Marco Cruz", "regular").await;
    ledger
        .record_payment(&member_id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();

    let member = ledger.get_member_required(&member_id).await.unwrap();
    assert_eq!(member.cbu, BigDecimal::from(500));
}

/// Enrollment with an initial payment records a membership-fee payment that
/// feeds fee progress but not aggregates.
#[tokio::test]
async fn test_enrollment_with_initial_payment() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;

    let member = ledger
        .add_member(&NewMember {
            name: "Elena Reyes".to_string(),
            membership_type_id: "uve".to_string(),
            initial_payment: Some(BigDecimal::from(750)),
            ..Default::default()
        })
        .await
        .unwrap();

    let history = ledger.payment_history(&member.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].payment_type, PaymentType::Membership);
    assert_eq!(history[0].notes.as_deref(), Some("Initial payment"));

    let member_row = ledger.get_member_required(&member.id).await.unwrap();
    assert_eq!(member_row.cbu, BigDecimal::from(0));

    let membership_type = ledger.get_membership_type("uve").await.unwrap().unwrap();
    let progress = progress::fee_progress(&membership_type, &history);
    assert_eq!(progress.percentage, 50);
    assert_eq!(
        progress::outstanding_fee(&membership_type, &history),
        BigDecimal::from(750)
    );
}

/// A member whose membership type cannot be resolved is accepted fee-only:
/// payments are recorded but no aggregate update occurs.
#[tokio::test]
async fn test_unresolvable_membership_type_is_fee_only() {
    let mut storage = MemoryStorage::new();

    // Dangling membership_type_id: no such type is registered.
    let member = Member::new(
        "m1".to_string(),
        "Elena Reyes".to_string(),
        "retired-type".to_string(),
        chrono::NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    );
    storage.save_member(&member).await.unwrap();

    let mut ledger = MembershipLedger::new(storage);

    ledger
        .record_payment("m1", BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();
    ledger
        .record_payment("m1", BigDecimal::from(50), PaymentType::DailyDues, None)
        .await
        .unwrap();
    let cbu_payment = ledger
        .record_payment("m1", BigDecimal::from(300), PaymentType::Cbu, None)
        .await
        .unwrap();

    let member = ledger.get_member_required("m1").await.unwrap();
    assert_eq!(member.monthly_dues, BigDecimal::from(0));
    assert_eq!(member.daily_dues, BigDecimal::from(0));
    assert_eq!(member.cbu, BigDecimal::from(0));

    // The payments themselves were recorded, and reversing transitions
    // stay fee-only too.
    assert_eq!(ledger.payment_history("m1").await.unwrap().len(), 3);

    ledger.delete_payment(&cbu_payment.id).await.unwrap();
    let member = ledger.get_member_required("m1").await.unwrap();
    assert_eq!(member.cbu, BigDecimal::from(0));
}

/// Unknown members and payments surface as not-found errors.
#[tokio::test]
async fn test_not_found_errors() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;

    let missing_member = ledger
        .record_payment("ghost", BigDecimal::from(100), PaymentType::Cbu, None)
        .await;
    assert!(matches!(missing_member, Err(LedgerError::MemberNotFound(_))));

    let missing_payment = ledger.delete_payment("ghost").await;
    assert!(matches!(
        missing_payment,
        Err(LedgerError::PaymentNotFound(_))
    ));

    let missing_type = ledger
        .add_member(&NewMember {
            name: "Nobody".to_string(),
            membership_type_id: "ghost".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        missing_type,
        Err(LedgerError::MembershipTypeNotFound(_))
    ));
}

/// Validators reject non-positive amounts.
#[tokio::test]
async fn test_payment_validation() {
    let storage = MemoryStorage::new();
    let mut ledger = MembershipLedger::with_validators(
        storage,
        ReconciliationEngine::default(),
        Box::new(EnhancedMemberValidator),
        Box::new(EnhancedPaymentValidator),
    );

    ledger
        .save_membership_type(&MembershipType::new(
            "uve".to_string(),
            "UVE".to_string(),
            BigDecimal::from(1500),
            BigDecimal::from(10000),
            "primary".to_string(),
        ))
        .await
        .unwrap();

    let member_id = enroll(&mut ledger, "Elena Reyes", "uve").await;

    let zero = ledger
        .record_payment(&member_id, BigDecimal::from(0), PaymentType::Cbu, None)
        .await;
    assert!(matches!(zero, Err(LedgerError::Validation(_))));

    let negative = ledger
        .record_payment(&member_id, BigDecimal::from(-5), PaymentType::Cbu, None)
        .await;
    assert!(matches!(negative, Err(LedgerError::Validation(_))));
}

/// Members list and counts group by membership type.
#[tokio::test]
async fn test_member_listing_and_counts() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;

    enroll(&mut ledger, "Zara Lim", "uve").await;
    enroll(&mut ledger, "Andres Uy", "uve").await;
    enroll(&mut ledger, "Marco Cruz", "regular").await;

    let all = ledger.list_members().await.unwrap();
    assert_eq!(all.len(), 3);
    // Ordered by name
    assert_eq!(all[0].name, "Andres Uy");
    assert_eq!(all[2].name, "Zara Lim");

    assert_eq!(ledger.member_count_by_type("uve").await.unwrap(), 2);
    assert_eq!(ledger.member_count_by_type("regular").await.unwrap(), 1);

    let types = ledger.list_membership_types().await.unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].name, "Regular");
}

/// Payment rows serialize with the persisted wire names.
#[tokio::test]
async fn test_payment_serialization() {
    let mut ledger = ledger_with_types(MemoryStorage::new()).await;
    let member_id = enroll(&mut ledger, "Elena Reyes", "uve").await;

    let payment = ledger
        .record_payment(&member_id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await
        .unwrap();

    let json = serde_json::to_value(&payment).unwrap();
    assert_eq!(json["payment_type"], "monthly_dues");
    assert_eq!(json["is_deleted"], false);
}
