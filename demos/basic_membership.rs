//! Basic membership ledger usage example

use bigdecimal::BigDecimal;
use membership_core::utils::MemoryStorage;
use membership_core::{
    progress, MembershipLedger, MembershipType, NewMember, PaymentType, PaymentUpdate,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Membership Core - Basic Ledger Example\n");

    let storage = MemoryStorage::new();
    let mut ledger = MembershipLedger::new(storage);

    // 1. Register membership types
    println!("Registering membership types...");
    ledger
        .save_membership_type(&MembershipType::new(
            "uve".to_string(),
            "UVE".to_string(),
            BigDecimal::from(1500),
            BigDecimal::from(10000),
            "primary".to_string(),
        ))
        .await?;
    ledger
        .save_membership_type(&MembershipType::new(
            "regular".to_string(),
            "Regular".to_string(),
            BigDecimal::from(1000),
            BigDecimal::from(0),
            "secondary".to_string(),
        ))
        .await?;

    for membership_type in ledger.list_membership_types().await? {
        println!(
            "  - {} (fee {}, CBU target {})",
            membership_type.name, membership_type.fee, membership_type.cbu_target
        );
    }
    println!();

    // 2. Enroll a member with an initial membership-fee payment
    println!("Enrolling member...");
    let member = ledger
        .add_member(&NewMember {
            name: "Elena Reyes".to_string(),
            membership_type_id: "uve".to_string(),
            initial_payment: Some(BigDecimal::from(750)),
            ..Default::default()
        })
        .await?;
    println!("  - Enrolled {} ({})\n", member.name, member.id);

    // 3. Record dues; UVE is CBU-eligible, so monthly dues credit CBU too
    println!("Recording payments...");
    let dues = ledger
        .record_payment(&member.id, BigDecimal::from(500), PaymentType::MonthlyDues, None)
        .await?;
    ledger
        .record_payment(&member.id, BigDecimal::from(200), PaymentType::Cbu, None)
        .await?;

    let current = ledger.get_member_required(&member.id).await?;
    println!(
        "  - monthly_dues = {}, cbu = {}\n",
        current.monthly_dues, current.cbu
    );

    // 4. Correct the dues payment down to 300
    println!("Editing the dues payment to 300...");
    ledger
        .edit_payment(&dues.id, &PaymentUpdate::new().amount(BigDecimal::from(300)))
        .await?;

    let current = ledger.get_member_required(&member.id).await?;
    println!(
        "  - monthly_dues = {}, cbu = {}\n",
        current.monthly_dues, current.cbu
    );

    // 5. Progress reporting
    let membership_type = ledger
        .get_membership_type(&current.membership_type_id)
        .await?
        .expect("type registered above");
    let history = ledger.payment_history(&member.id).await?;

    let fee = progress::fee_progress(&membership_type, &history);
    let cbu = progress::cbu_progress(&current, &membership_type);
    println!("Progress:");
    println!(
        "  - membership fee: {:?} ({}%), outstanding {}",
        fee.status,
        fee.percentage,
        progress::outstanding_fee(&membership_type, &history)
    );
    println!(
        "  - CBU: {:?} ({}%), remaining {}",
        cbu.status,
        cbu.percentage,
        progress::cbu_remaining(&current, &membership_type)
    );
    println!();

    // 6. Soft-delete the dues payment; its effect is reversed
    println!("Deleting the dues payment...");
    ledger.delete_payment(&dues.id).await?;

    let current = ledger.get_member_required(&member.id).await?;
    println!(
        "  - monthly_dues = {}, cbu = {}",
        current.monthly_dues, current.cbu
    );

    println!("  - live payments remaining:");
    for payment in ledger.payment_history(&member.id).await? {
        println!(
            "      {} {} on {}",
            payment.payment_type.label(),
            payment.amount,
            payment.payment_date
        );
    }

    Ok(())
}
