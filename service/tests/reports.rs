//! Supplier dashboard, vendor availability and order history.

mod support;

use common::DateTime;
use service::{
    command::{
        CancelOrder, CloseGroupBuy, CreateGroupBuy, CreateProduct, PlaceOrder,
    },
    domain::{group_buy, order, product, profile::Role},
    error::{Categorize as _, Kind},
    query::{
        orders,
        report::{SupplierDashboard, VendorAvailability},
    },
    Command as _, Query as _,
};

use self::support::{area, dec, in_days, minutes_ago, service};

fn qty(value: i64) -> group_buy::Quantity {
    group_buy::Quantity::new(dec(value)).expect("non-negative")
}

#[tokio::test]
async fn dashboard_summarizes_recent_group_buys() {
    let (service, db, _) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    let ids = (0..7)
        .map(|n| {
            db.group_buy_created_at(
                &onions,
                "Indore",
                in_days(1),
                minutes_ago(100 - n * 10),
            )
            .id
        })
        .collect::<Vec<_>>();
    let newest = ids[6];
    let oldest = ids[0];

    let (first, second) = (db.vendor("Indore"), db.vendor("Indore"));
    _ = db.order_at(&first, newest, 10, DateTime::now());
    let cancelled = db.order_at(&second, newest, 5, DateTime::now());
    _ = service
        .execute(CancelOrder {
            actor: second,
            order_id: cancelled.id,
        })
        .await
        .expect("cancelled");
    _ = db.order_at(&first, ids[5], 3, DateTime::now());
    _ = db.order_at(&first, oldest, 50, DateTime::now());

    let dashboard = service
        .execute(SupplierDashboard {
            supplier_id: supplier.id,
        })
        .await
        .expect("dashboard");

    assert_eq!(u64::from(dashboard.total_group_buys), 7);
    assert_eq!(dashboard.recent_group_buys.len(), 5);
    assert_eq!(dashboard.recent_group_buys[0].group_buy.id, newest);
    assert_eq!(dashboard.recent_group_buys[0].ordered_quantity, qty(10));
    assert_eq!(dashboard.recent_group_buys[1].ordered_quantity, qty(3));
    assert_eq!(dashboard.recent_group_buys[4].ordered_quantity, qty(0));
    assert_eq!(dashboard.total_ordered_quantity, qty(13));
}

#[tokio::test]
async fn dashboard_of_new_supplier_is_empty() {
    let (service, db, _) = service();

    let dashboard = service
        .execute(SupplierDashboard {
            supplier_id: db.supplier("Ravi Traders").id,
        })
        .await
        .expect("dashboard");

    assert_eq!(u64::from(dashboard.total_group_buys), 0);
    assert!(dashboard.recent_group_buys.is_empty());
    assert_eq!(dashboard.total_ordered_quantity, qty(0));
}

#[tokio::test]
async fn vendor_sees_active_group_buys_of_own_area_soonest_first() {
    let (service, db, _) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    let later = db.group_buy(&onions, "Indore", in_days(3));
    let sooner = db.group_buy(&onions, "Indore", in_days(1));
    _ = db.group_buy(&onions, "Bhopal", in_days(1));
    let closed = db.group_buy(&onions, "Indore", in_days(2));
    _ = service
        .execute(CloseGroupBuy {
            actor: supplier,
            group_buy_id: closed.id,
            status: group_buy::Status::Completed,
        })
        .await
        .expect("closed");
    let vendor = db.vendor("Indore");

    let listings = service
        .execute(VendorAvailability {
            vendor_id: vendor.id,
        })
        .await
        .expect("listed");

    let ids = listings.iter().map(|l| l.group_buy.id).collect::<Vec<_>>();
    assert_eq!(ids, [sooner.id, later.id]);
    assert!(listings.iter().all(|l| l.group_buy.area_name == area("Indore")));
    assert_eq!(listings[0].product.id, onions.id);
}

#[tokio::test]
async fn vendor_without_area_cannot_see_availability() {
    let (service, db, _) = service();
    let vendor = db.add_profile(Role::Vendor, "Street Vendor", None);

    let err = service
        .execute(VendorAvailability {
            vendor_id: vendor.id,
        })
        .await
        .expect_err("no area");

    assert_eq!(err.kind(), Kind::InvalidInput);
}

#[tokio::test]
async fn lists_vendor_orders_newest_first() {
    let (service, db, _) = service();
    let supplier = db.supplier("Ravi Traders");
    let onions = db.product(&supplier, "Onions");
    let rice = db.product(&supplier, "Rice");
    let onions_buy = db.group_buy(&onions, "Indore", in_days(1));
    let rice_buy = db.group_buy(&rice, "Indore", in_days(1));
    let vendor = db.vendor("Indore");
    let old = db.order_at(&vendor, onions_buy.id, 2, minutes_ago(60));
    let new = db.order_at(&vendor, rice_buy.id, 4, minutes_ago(5));
    _ = db.order_at(&db.vendor("Indore"), rice_buy.id, 1, minutes_ago(1));

    let history = service
        .execute(orders::ByVendor::by(vendor.id))
        .await
        .expect("listed");

    let ids = history.iter().map(|d| d.order.id).collect::<Vec<_>>();
    assert_eq!(ids, [new.id, old.id]);
    assert_eq!(history[0].product.id, rice.id);
    assert_eq!(history[1].group_buy.id, onions_buy.id);
}

#[tokio::test]
async fn onions_in_indore_end_to_end() {
    let (service, db, _) = service();
    let supplier = db.supplier("Ravi Traders");
    let vendor = db.vendor("Indore");

    let onions = service
        .execute(CreateProduct {
            actor: supplier.clone(),
            name: product::Name::new("Onions").expect("valid"),
            description: None,
            image_url: None,
            search_keywords: None,
        })
        .await
        .expect("product created");
    let group_buy = service
        .execute(CreateGroupBuy {
            actor: supplier.clone(),
            product_id: onions.id,
            title: None,
            end_date: in_days(1),
            target_quantity: Some(dec(100)),
            area_name: area("Indore"),
            price_per_unit: dec(20),
        })
        .await
        .expect("group buy created");
    assert_eq!(group_buy.status, group_buy::Status::Active);
    assert_eq!(group_buy.current_quantity, qty(0));

    let available = service
        .execute(VendorAvailability {
            vendor_id: vendor.id,
        })
        .await
        .expect("listed");
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].group_buy.id, group_buy.id);

    let place = || PlaceOrder {
        actor: vendor.clone(),
        group_buy_id: group_buy.id,
        quantity: dec(10),
    };
    let order = service.execute(place()).await.expect("order placed");
    assert_eq!(db.find_group_buy(group_buy.id).current_quantity, qty(10));

    let err = service.execute(place()).await.expect_err("duplicate");
    assert_eq!(err.kind(), Kind::DuplicateCommitment);

    let cancelled = service
        .execute(CancelOrder {
            actor: vendor,
            order_id: order.id,
        })
        .await
        .expect("cancelled");
    assert_eq!(cancelled.status, order::Status::Cancelled);

    let dashboard = service
        .execute(SupplierDashboard {
            supplier_id: supplier.id,
        })
        .await
        .expect("dashboard");
    assert_eq!(u64::from(dashboard.total_group_buys), 1);
    assert_eq!(dashboard.recent_group_buys[0].ordered_quantity, qty(0));
    assert_eq!(dashboard.total_ordered_quantity, qty(0));
}
