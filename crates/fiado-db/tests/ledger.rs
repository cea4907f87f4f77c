//! End-to-end ledger scenarios against an in-memory SQLite database.

use chrono::NaiveDate;

use fiado_core::request::{CreateSaleRequest, InstallmentRequest, PaymentRequest, SaleItemRequest};
use fiado_core::{CoreError, PaymentMode};
use fiado_db::{CustomerInput, Database, DbConfig, LedgerError, ProductInput};

// =============================================================================
// Helpers
// =============================================================================

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.expect("database")
}

async fn seed_customer(db: &Database) -> String {
    let input = CustomerInput {
        first_name: "Ana".to_string(),
        last_name: Some("García".to_string()),
        phone: None,
        email: None,
        address: None,
        city: None,
        notes: None,
    };
    db.customers().create(&input).await.expect("customer").id
}

async fn seed_product(db: &Database, price_cents: i64, stock: i64) -> String {
    let input = ProductInput {
        name: "Yerba 1kg".to_string(),
        description: None,
        cost_cents: 10_000,
        price_cents,
        quantity_on_hand: stock,
    };
    db.products().create(&input).await.expect("product").id
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn cash_request(customer_id: &str, product_id: &str, quantity: i64) -> CreateSaleRequest {
    CreateSaleRequest {
        date: Some(d(2024, 1, 1)),
        customer_id: customer_id.to_string(),
        payment_mode: PaymentMode::Cash,
        interest_rate_bps: 0,
        items: vec![SaleItemRequest {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents: 12_000,
        }],
        installments: vec![],
        installment_count: None,
        first_due_on: None,
        down_payment_cents: 0,
    }
}

/// Credit sale worth $1000.00 before interest, 10% interest, three
/// generated installments starting 2024-01-01.
fn credit_request(customer_id: &str, product_id: &str) -> CreateSaleRequest {
    CreateSaleRequest {
        date: Some(d(2024, 1, 1)),
        customer_id: customer_id.to_string(),
        payment_mode: PaymentMode::Credit,
        interest_rate_bps: 1000,
        items: vec![SaleItemRequest {
            product_id: product_id.to_string(),
            quantity: 1,
            unit_price_cents: 100_000,
        }],
        installments: vec![],
        installment_count: Some(3),
        first_due_on: Some(d(2024, 1, 1)),
        down_payment_cents: 0,
    }
}

// =============================================================================
// Sale Creation
// =============================================================================

#[tokio::test]
async fn cash_sale_settles_immediately_and_decrements_stock() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 12_000, 5).await;

    let created = db
        .ledger()
        .create_sale(&cash_request(&customer_id, &product_id, 3))
        .await
        .expect("cash sale");

    // 3 × $120.00 = $360.00, fully settled at creation
    assert_eq!(created.total_cents, 36_000);
    assert_eq!(created.balance_cents, 0);

    let sale = db
        .sales()
        .get_by_id(&created.sale_id)
        .await
        .unwrap()
        .expect("sale row");
    assert_eq!(sale.interest_rate_bps, 0);
    assert!(sale.is_settled());

    // One implicit payment for the full total, tied to no installment
    let payments = db.sales().get_payments(&created.sale_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_cents, 36_000);
    assert!(payments[0].installment_id.is_none());
    assert_eq!(payments[0].paid_on, d(2024, 1, 1));

    // Stock 5 → 2
    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, 2);
}

#[tokio::test]
async fn zero_total_cash_sale_settles_without_a_payment_row() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 0, 5).await;

    let mut req = cash_request(&customer_id, &product_id, 2);
    req.items[0].unit_price_cents = 0;

    let created = db.ledger().create_sale(&req).await.expect("giveaway sale");
    assert_eq!(created.total_cents, 0);
    assert_eq!(created.balance_cents, 0);

    assert!(db
        .sales()
        .get_payments(&created.sale_id)
        .await
        .unwrap()
        .is_empty());

    // Stock still moves
    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, 3);
}

#[tokio::test]
async fn cash_sale_forces_interest_to_zero() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 12_000, 5).await;

    let mut req = cash_request(&customer_id, &product_id, 1);
    req.interest_rate_bps = 1500;

    let created = db.ledger().create_sale(&req).await.expect("cash sale");

    let sale = db.sales().get_by_id(&created.sale_id).await.unwrap().unwrap();
    assert_eq!(sale.interest_rate_bps, 0);
    assert_eq!(sale.total_cents, 12_000);
}

#[tokio::test]
async fn credit_sale_generates_remainder_safe_schedule() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let created = db
        .ledger()
        .create_sale(&credit_request(&customer_id, &product_id))
        .await
        .expect("credit sale");

    // $1000.00 + 10% = $1100.00, nothing paid yet
    assert_eq!(created.total_cents, 110_000);
    assert_eq!(created.balance_cents, 110_000);

    let installments = db.sales().get_installments(&created.sale_id).await.unwrap();
    let amounts: Vec<i64> = installments.iter().map(|i| i.amount_cents).collect();
    assert_eq!(amounts, vec![36_667, 36_667, 36_666]);

    let dues: Vec<NaiveDate> = installments.iter().map(|i| i.due_on).collect();
    assert_eq!(dues, vec![d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1)]);

    for inst in &installments {
        assert_eq!(inst.paid_cents, 0);
        assert_eq!(inst.outstanding_cents, inst.amount_cents);
    }

    // No payment rows exist until money actually arrives
    assert!(db
        .sales()
        .get_payments(&created.sale_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn credit_sale_accepts_explicit_schedule_verbatim() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let mut req = credit_request(&customer_id, &product_id);
    req.installment_count = None;
    req.installments = vec![
        InstallmentRequest {
            seq: 1,
            due_on: d(2024, 2, 15),
            amount_cents: 60_000,
        },
        InstallmentRequest {
            seq: 2,
            due_on: d(2024, 3, 15),
            amount_cents: 50_000,
        },
    ];

    let created = db.ledger().create_sale(&req).await.expect("credit sale");

    let installments = db.sales().get_installments(&created.sale_id).await.unwrap();
    assert_eq!(installments.len(), 2);
    assert_eq!(installments[0].amount_cents, 60_000);
    assert_eq!(installments[1].due_on, d(2024, 3, 15));
}

#[tokio::test]
async fn mismatched_schedule_sum_is_rejected() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let mut req = credit_request(&customer_id, &product_id);
    req.installment_count = None;
    // Sums to $1000.00 but the financed amount is $1100.00
    req.installments = vec![InstallmentRequest {
        seq: 1,
        due_on: d(2024, 2, 1),
        amount_cents: 100_000,
    }];

    let err = db.ledger().create_sale(&req).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::ScheduleSumMismatch {
            expected_cents: 110_000,
            supplied_cents: 100_000,
        })
    ));

    // Nothing persisted, stock untouched
    assert!(db.sales().list().await.unwrap().is_empty());
    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, 10);
}

#[tokio::test]
async fn credit_sale_without_schedule_or_count_is_rejected() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let mut req = credit_request(&customer_id, &product_id);
    req.installment_count = None;

    let err = db.ledger().create_sale(&req).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::MissingInstallments)
    ));
}

#[tokio::test]
async fn unknown_customer_is_rejected() {
    let db = test_db().await;
    let product_id = seed_product(&db, 12_000, 5).await;

    let ghost = "00000000-0000-0000-0000-000000000001";
    let err = db
        .ledger()
        .create_sale(&cash_request(ghost, &product_id, 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::CustomerNotFound(_))
    ));
}

// =============================================================================
// Stock Conservation
// =============================================================================

#[tokio::test]
async fn oversell_rejects_sale_and_leaves_no_trace() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 12_000, 5).await;

    let err = db
        .ledger()
        .create_sale(&cash_request(&customer_id, &product_id, 6))
        .await
        .unwrap_err();

    match err {
        LedgerError::Domain(CoreError::InsufficientStock {
            available,
            requested,
            ..
        }) => {
            assert_eq!(available, 5);
            assert_eq!(requested, 6);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // No sale row survives the rollback, and stock is unchanged
    assert!(db.sales().list().await.unwrap().is_empty());
    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, 5);
}

#[tokio::test]
async fn failing_line_rolls_back_earlier_decrements() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let plentiful = seed_product(&db, 12_000, 50).await;
    let scarce = seed_product(&db, 8_000, 1).await;

    let mut req = cash_request(&customer_id, &plentiful, 10);
    req.items.push(SaleItemRequest {
        product_id: scarce.clone(),
        quantity: 2,
        unit_price_cents: 8_000,
    });

    let err = db.ledger().create_sale(&req).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::InsufficientStock { .. })
    ));

    // The first line's decrement was rolled back with everything else
    let first = db.products().get_by_id(&plentiful).await.unwrap().unwrap();
    assert_eq!(first.quantity_on_hand, 50);
    let second = db.products().get_by_id(&scarce).await.unwrap().unwrap();
    assert_eq!(second.quantity_on_hand, 1);
}

// =============================================================================
// Payment Allocation
// =============================================================================

#[tokio::test]
async fn payment_fills_installments_oldest_sequence_first() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let created = db
        .ledger()
        .create_sale(&credit_request(&customer_id, &product_id))
        .await
        .unwrap();

    // $500.00 against 366.67 / 366.67 / 366.66
    let outcome = db
        .ledger()
        .apply_payment(
            &created.sale_id,
            &PaymentRequest {
                amount_cents: 50_000,
                date: Some(d(2024, 1, 15)),
            },
        )
        .await
        .expect("payment");

    assert_eq!(outcome.new_balance_cents, 60_000);
    assert_eq!(outcome.allocations.len(), 2);
    assert_eq!(outcome.allocations[0].seq, 1);
    assert_eq!(outcome.allocations[0].amount_cents, 36_667);
    assert_eq!(outcome.allocations[1].seq, 2);
    assert_eq!(outcome.allocations[1].amount_cents, 13_333);

    let installments = db.sales().get_installments(&created.sale_id).await.unwrap();
    assert_eq!(installments[0].outstanding_cents, 0);
    assert_eq!(installments[0].paid_cents, 36_667);
    assert_eq!(installments[1].outstanding_cents, 23_334);
    assert_eq!(installments[2].outstanding_cents, 36_666);

    // One payment row per touched installment
    let payments = db.sales().get_payments(&created.sale_id).await.unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.installment_id.is_some()));
    assert!(payments.iter().all(|p| p.paid_on == d(2024, 1, 15)));
}

#[tokio::test]
async fn small_payment_touches_only_first_installment() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let created = db
        .ledger()
        .create_sale(&credit_request(&customer_id, &product_id))
        .await
        .unwrap();

    let outcome = db
        .ledger()
        .apply_payment(
            &created.sale_id,
            &PaymentRequest {
                amount_cents: 10_000,
                date: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.allocations.len(), 1);
    assert_eq!(outcome.allocations[0].seq, 1);
    assert_eq!(outcome.allocations[0].amount_cents, 10_000);

    let installments = db.sales().get_installments(&created.sale_id).await.unwrap();
    assert_eq!(installments[0].outstanding_cents, 26_667);
    assert_eq!(installments[1].outstanding_cents, 36_667);
}

#[tokio::test]
async fn balance_conservation_over_payment_sequence() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let created = db
        .ledger()
        .create_sale(&credit_request(&customer_id, &product_id))
        .await
        .unwrap();

    let amounts = [30_000i64, 25_000, 40_000, 15_000];
    let mut expected_balance = 110_000i64;

    for cents in amounts {
        let outcome = db
            .ledger()
            .apply_payment(
                &created.sale_id,
                &PaymentRequest {
                    amount_cents: cents,
                    date: None,
                },
            )
            .await
            .expect("payment");
        expected_balance -= cents;
        assert_eq!(outcome.new_balance_cents, expected_balance);
    }

    // balance == total − sum(payments), fully settled here
    let sale = db.sales().get_by_id(&created.sale_id).await.unwrap().unwrap();
    assert_eq!(sale.balance_cents, 0);
    assert_eq!(db.sales().get_total_paid(&created.sale_id).await.unwrap(), 110_000);

    // paid + outstanding == amount on every installment, all settled
    let installments = db.sales().get_installments(&created.sale_id).await.unwrap();
    for inst in &installments {
        assert_eq!(inst.paid_cents + inst.outstanding_cents, inst.amount_cents);
        assert!(inst.is_settled());
    }
}

#[tokio::test]
async fn payment_exceeding_balance_is_rejected() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let created = db
        .ledger()
        .create_sale(&credit_request(&customer_id, &product_id))
        .await
        .unwrap();

    let err = db
        .ledger()
        .apply_payment(
            &created.sale_id,
            &PaymentRequest {
                amount_cents: 110_001,
                date: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::ExceedsBalance {
            requested_cents: 110_001,
            balance_cents: 110_000,
        })
    ));

    // Rejected payment leaves no rows behind
    assert!(db
        .sales()
        .get_payments(&created.sale_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn cash_sale_refuses_payments() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 12_000, 5).await;

    let created = db
        .ledger()
        .create_sale(&cash_request(&customer_id, &product_id, 1))
        .await
        .unwrap();

    let err = db
        .ledger()
        .apply_payment(
            &created.sale_id,
            &PaymentRequest {
                amount_cents: 100,
                date: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::NotPayable { .. })
    ));
}

#[tokio::test]
async fn payment_against_unknown_sale_is_rejected() {
    let db = test_db().await;

    let err = db
        .ledger()
        .apply_payment(
            "00000000-0000-0000-0000-00000000dead",
            &PaymentRequest {
                amount_cents: 100,
                date: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::SaleNotFound(_))
    ));
}

// =============================================================================
// Down Payments
// =============================================================================

#[tokio::test]
async fn down_payment_is_recorded_with_the_sale() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let mut req = credit_request(&customer_id, &product_id);
    req.installment_count = Some(4);
    req.down_payment_cents = 10_000;

    let created = db.ledger().create_sale(&req).await.expect("credit sale");

    // total $1100.00; $100.00 tendered up front leaves $1000.00 financed
    assert_eq!(created.total_cents, 110_000);
    assert_eq!(created.balance_cents, 100_000);

    // The schedule covers exactly the financed amount, all of it still owed
    let installments = db.sales().get_installments(&created.sale_id).await.unwrap();
    assert_eq!(installments.len(), 4);
    let total_scheduled: i64 = installments.iter().map(|i| i.amount_cents).sum();
    assert_eq!(total_scheduled, 100_000);
    for inst in &installments {
        assert_eq!(inst.outstanding_cents, inst.amount_cents);
    }

    // The down payment is a payment row tied to no installment
    let payments = db.sales().get_payments(&created.sale_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_cents, 10_000);
    assert!(payments[0].installment_id.is_none());
    assert_eq!(payments[0].paid_on, d(2024, 1, 1));
}

#[tokio::test]
async fn down_payment_sale_can_be_settled_in_full() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let mut req = credit_request(&customer_id, &product_id);
    req.installment_count = Some(3);
    req.down_payment_cents = 10_000;

    let created = db.ledger().create_sale(&req).await.unwrap();

    // Paying the whole remaining balance settles every installment
    let outcome = db
        .ledger()
        .apply_payment(
            &created.sale_id,
            &PaymentRequest {
                amount_cents: created.balance_cents,
                date: Some(d(2024, 2, 1)),
            },
        )
        .await
        .expect("full payoff");

    assert_eq!(outcome.new_balance_cents, 0);

    let sale = db.sales().get_by_id(&created.sale_id).await.unwrap().unwrap();
    assert!(sale.is_settled());

    let installments = db.sales().get_installments(&created.sale_id).await.unwrap();
    assert!(installments.iter().all(|i| i.is_settled()));

    // balance == total − sum(all payments), down payment included
    assert_eq!(
        db.sales().get_total_paid(&created.sale_id).await.unwrap(),
        created.total_cents
    );
}

#[tokio::test]
async fn down_payment_covering_the_total_is_rejected() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let mut req = credit_request(&customer_id, &product_id);
    // total is $1100.00 with interest
    req.down_payment_cents = 110_000;

    let err = db.ledger().create_sale(&req).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(CoreError::Validation(_))
    ));
    assert!(db.sales().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn cash_sale_ignores_supplied_installments() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 12_000, 5).await;

    let mut req = cash_request(&customer_id, &product_id, 1);
    req.installments = vec![InstallmentRequest {
        seq: 1,
        due_on: d(2024, 2, 1),
        amount_cents: 12_000,
    }];

    let created = db.ledger().create_sale(&req).await.expect("cash sale");
    assert_eq!(created.balance_cents, 0);
    assert!(db
        .sales()
        .get_installments(&created.sale_id)
        .await
        .unwrap()
        .is_empty());
}

// =============================================================================
// Read-Back
// =============================================================================

#[tokio::test]
async fn sale_detail_reproduces_header_totals() {
    let db = test_db().await;
    let customer_id = seed_customer(&db).await;
    let product_id = seed_product(&db, 100_000, 10).await;

    let created = db
        .ledger()
        .create_sale(&credit_request(&customer_id, &product_id))
        .await
        .unwrap();

    let detail = db
        .sales()
        .detail(&created.sale_id)
        .await
        .unwrap()
        .expect("detail");

    assert_eq!(detail.customer_name, "García, Ana");

    // Items reproduce the pre-interest total
    let items_total: i64 = detail.items.iter().map(|i| i.line_total().cents()).sum();
    assert_eq!(items_total, 100_000);

    // Installments reproduce the financed amount == balance
    let scheduled: i64 = detail.installments.iter().map(|i| i.amount_cents).sum();
    assert_eq!(scheduled, detail.sale.balance_cents);
    assert_eq!(detail.sale.total_cents, created.total_cents);

    // Listing shows the same header
    let listed = db.sales().list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.sale_id);
    assert_eq!(listed[0].customer_name, "García, Ana");
    assert_eq!(listed[0].balance_cents, 110_000);
}
