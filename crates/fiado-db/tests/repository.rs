//! Repository CRUD behavior, including referential delete guards.

use fiado_core::request::{CreateSaleRequest, SaleItemRequest};
use fiado_core::PaymentMode;
use fiado_db::{CustomerInput, Database, DbConfig, DbError, ProductInput};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.expect("database")
}

fn product_input(name: &str) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: Some("battery pack".to_string()),
        cost_cents: 5_000,
        price_cents: 9_000,
        quantity_on_hand: 12,
    }
}

fn customer_input(first: &str) -> CustomerInput {
    CustomerInput {
        first_name: first.to_string(),
        last_name: None,
        phone: Some("555-0001".to_string()),
        email: None,
        address: None,
        city: None,
        notes: None,
    }
}

#[tokio::test]
async fn product_crud_roundtrip() {
    let db = test_db().await;
    let repo = db.products();

    let created = repo.create(&product_input("Pilas AA")).await.unwrap();
    assert_eq!(created.price().cents(), 9_000);

    let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Pilas AA");
    assert_eq!(fetched.quantity_on_hand, 12);

    let mut update = product_input("Pilas AAA");
    update.price_cents = 9_500;
    let updated = repo.update(&created.id, &update).await.unwrap();
    assert_eq!(updated.name, "Pilas AAA");
    assert_eq!(updated.price_cents, 9_500);

    repo.delete(&created.id).await.unwrap();
    assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn product_list_is_ordered_by_name() {
    let db = test_db().await;
    let repo = db.products();

    repo.create(&product_input("Zapatillas")).await.unwrap();
    repo.create(&product_input("Azúcar")).await.unwrap();

    let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Azúcar".to_string(), "Zapatillas".to_string()]);
}

#[tokio::test]
async fn missing_product_update_and_delete_report_not_found() {
    let db = test_db().await;
    let repo = db.products();
    let ghost = "00000000-0000-0000-0000-000000000009";

    assert!(matches!(
        repo.update(ghost, &product_input("x")).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
    assert!(matches!(
        repo.delete(ghost).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
}

#[tokio::test]
async fn customer_crud_roundtrip() {
    let db = test_db().await;
    let repo = db.customers();

    let created = repo.create(&customer_input("Marta")).await.unwrap();

    let mut update = customer_input("Marta");
    update.last_name = Some("Suárez".to_string());
    update.city = Some("Rosario".to_string());
    let updated = repo.update(&created.id, &update).await.unwrap();
    assert_eq!(updated.display_name(), "Suárez, Marta");
    assert_eq!(updated.city.as_deref(), Some("Rosario"));

    repo.delete(&created.id).await.unwrap();
    assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn referenced_product_and_customer_cannot_be_deleted() {
    let db = test_db().await;
    let customer = db.customers().create(&customer_input("Marta")).await.unwrap();
    let product = db.products().create(&product_input("Pilas AA")).await.unwrap();

    let req = CreateSaleRequest {
        date: None,
        customer_id: customer.id.clone(),
        payment_mode: PaymentMode::Cash,
        interest_rate_bps: 0,
        items: vec![SaleItemRequest {
            product_id: product.id.clone(),
            quantity: 2,
            unit_price_cents: 9_000,
        }],
        installments: vec![],
        installment_count: None,
        first_due_on: None,
        down_payment_cents: 0,
    };
    db.ledger().create_sale(&req).await.expect("sale");

    assert!(matches!(
        db.products().delete(&product.id).await.unwrap_err(),
        DbError::StillReferenced { .. }
    ));
    assert!(matches!(
        db.customers().delete(&customer.id).await.unwrap_err(),
        DbError::StillReferenced { .. }
    ));

    // Both survive intact
    assert!(db.products().get_by_id(&product.id).await.unwrap().is_some());
    assert!(db.customers().get_by_id(&customer.id).await.unwrap().is_some());
}
