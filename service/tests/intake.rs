//! Placing orders out of free-form text.

mod support;

use rust_decimal::Decimal;
use service::{
    command::{PlaceOrder, PlaceOrderFromText},
    domain::order,
    error::{Categorize as _, Kind},
    Command as _,
};

use self::support::{dec, in_days, service};

#[tokio::test]
async fn textual_quantity_matches_explicit_order() {
    let (service, db, llm) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    let group_buy = db.group_buy(&onions, "Indore", in_days(1));
    llm.reply(
        "```json\n{\"productName\": \"Onions\", \"quantity\": \"5 kg\"}\n```",
    );

    let out = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Indore"),
            command: "I need 5 kg of onions".into(),
        })
        .await
        .expect("order placed");
    let explicit = service
        .execute(PlaceOrder {
            actor: db.vendor("Indore"),
            group_buy_id: group_buy.id,
            quantity: dec(5),
        })
        .await
        .expect("order placed");

    assert_eq!(out.parsed.product_name.as_ref(), "onions");
    assert_eq!(out.parsed.quantity, dec(5));
    assert_eq!(out.order.group_buy_id, explicit.group_buy_id);
    assert_eq!(out.order.quantity, explicit.quantity);
    assert_eq!(out.order.status, order::Status::Placed);
    assert!(llm.prompts()[0].contains("I need 5 kg of onions"));
}

#[tokio::test]
async fn reply_without_json_is_upstream_failure() {
    let (service, db, llm) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    _ = db.group_buy(&onions, "Indore", in_days(1));
    llm.reply("Sorry, I did not get that.");

    let err = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Indore"),
            command: "onions please".into(),
        })
        .await
        .expect_err("no json");

    assert_eq!(err.kind(), Kind::Upstream);
    assert!(db.orders().is_empty());
}

#[tokio::test]
async fn unreachable_llm_is_upstream_failure() {
    let (service, db, llm) = service();
    llm.fail();

    let err = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Indore"),
            command: "5 kg onions".into(),
        })
        .await
        .expect_err("llm failed");

    assert_eq!(err.kind(), Kind::Upstream);
}

#[tokio::test]
async fn llm_failure_message_hides_details() {
    let (service, db, llm) = service();
    llm.fail();

    let err = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Indore"),
            command: "5 kg onions".into(),
        })
        .await
        .expect_err("llm failed");

    assert_eq!(err.kind(), Kind::Upstream);
    assert_eq!(err.as_ref().to_string(), "Failed to process order with AI.");
}

#[tokio::test]
async fn unusable_fields_are_invalid_input() {
    let (service, db, llm) = service();
    llm.reply(r#"{"productName": "onions", "quantity": "a few"}"#);
    llm.reply(r#"{"quantity": 3}"#);

    for _ in 0..2 {
        let err = service
            .execute(PlaceOrderFromText {
                actor: db.vendor("Indore"),
                command: "some onions".into(),
            })
            .await
            .expect_err("unusable reply");

        assert_eq!(err.kind(), Kind::InvalidInput);
    }
}

#[tokio::test]
async fn blank_text_never_reaches_llm() {
    let (service, db, llm) = service();

    let err = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Indore"),
            command: "   ".into(),
        })
        .await
        .expect_err("blank");

    assert_eq!(err.kind(), Kind::InvalidInput);
    assert!(llm.prompts().is_empty());
}

#[tokio::test]
async fn unknown_or_ambiguous_product_is_not_found() {
    let (service, db, llm) = service();
    let supplier = db.supplier("Ravi Traders");
    for name in ["Onions", "Red Onions"] {
        let product = db.product(&supplier, name);
        _ = db.group_buy(&product, "Indore", in_days(1));
    }
    llm.reply(r#"{"productName": "tomatoes", "quantity": 2}"#);
    llm.reply(r#"{"productName": "onion", "quantity": 2}"#);

    for _ in 0..2 {
        let err = service
            .execute(PlaceOrderFromText {
                actor: db.vendor("Indore"),
                command: "2 kg".into(),
            })
            .await
            .expect_err("no single product");

        assert_eq!(err.kind(), Kind::NotFound);
    }
    assert!(db.orders().is_empty());
}

#[tokio::test]
async fn product_without_active_group_buy_is_not_found() {
    let (service, db, llm) = service();
    let supplier = db.supplier("Ravi Traders");
    _ = db.product(&supplier, "Onions");
    llm.reply(r#"{"productName": "Onions", "quantity": 2}"#);

    let err = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Indore"),
            command: "2 kg onions".into(),
        })
        .await
        .expect_err("no group buy");

    assert_eq!(err.kind(), Kind::NotFound);
    assert_eq!(
        err.as_ref().to_string(),
        "No active group buy found for \"onions\".",
    );
}

#[tokio::test]
async fn prefers_group_buy_in_vendor_area() {
    let (service, db, llm) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    _ = db.group_buy(&onions, "Indore", in_days(1));
    let local = db.group_buy(&onions, "Bhopal", in_days(2));
    llm.reply(r#"{"productName": "onions", "quantity": 7.5}"#);

    let out = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Bhopal"),
            command: "7.5 kg onions".into(),
        })
        .await
        .expect("order placed");

    assert_eq!(out.order.group_buy_id, local.id);
    assert_eq!(out.parsed.quantity, Decimal::new(75, 1));
}

#[tokio::test]
async fn duplicate_text_order_is_duplicate_commitment() {
    let (service, db, llm) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    _ = db.group_buy(&onions, "Indore", in_days(1));
    let vendor = db.vendor("Indore");
    llm.reply(r#"{"productName": "onions", "quantity": 5}"#);
    llm.reply(r#"{"productName": "onions", "quantity": 3}"#);

    let place = || PlaceOrderFromText {
        actor: vendor.clone(),
        command: "onions".into(),
    };
    _ = service.execute(place()).await.expect("first order placed");
    let err = service.execute(place()).await.expect_err("duplicate");

    assert_eq!(err.kind(), Kind::DuplicateCommitment);
    assert_eq!(db.orders().len(), 1);
}

#[tokio::test]
async fn native_digits_do_not_hide_ascii_quantity() {
    let (service, db, llm) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    _ = db.group_buy(&onions, "Indore", in_days(1));
    llm.reply(r#"{"productName": "onions", "quantity": "५ kg (5 kg)"}"#);

    let out = service
        .execute(PlaceOrderFromText {
            actor: db.vendor("Indore"),
            command: "पाँच किलो प्याज".into(),
        })
        .await
        .expect("order placed");

    assert_eq!(out.parsed.quantity, dec(5));
    assert_eq!(Decimal::from(out.order.quantity), dec(5));
}
