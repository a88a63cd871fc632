//! Products catalog and sessions authorization.

mod support;

use std::time::Duration;

use common::DateTime;
use jsonwebtoken::{EncodingKey, Header};
use service::{
    command::{AuthorizeSession, CreateProduct, UpdateProduct},
    domain::{
        product,
        profile::{self, Role, Session},
    },
    error::{Categorize as _, Kind},
    query::products,
    read,
    Command as _, Query as _,
};

use self::support::{service, JWT_SECRET};

fn name(value: &str) -> product::Name {
    product::Name::new(value).expect("valid name")
}

fn token(profile_id: profile::Id, lifetime: Duration) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &Session {
            profile_id,
            expires_at: (DateTime::now() + lifetime).coerce(),
        },
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .expect("encodable")
}

#[tokio::test]
async fn supplier_creates_and_lists_products() {
    let (service, db, _) = service();
    let supplier = db.supplier("Ravi Traders");
    let other = db.supplier("Mehta Wholesale");
    _ = db.product(&other, "Rice");

    let product = service
        .execute(CreateProduct {
            actor: supplier.clone(),
            name: name("Onions"),
            description: product::Description::new("Red onions from Nashik"),
            image_url: None,
            search_keywords: product::SearchKeywords::new("pyaaz, onion"),
        })
        .await
        .expect("product created");
    assert_eq!(product.supplier_id, supplier.id);
    assert!(product.updated_at.is_none());

    let mine = service
        .execute(products::BySupplier::by(supplier.id))
        .await
        .expect("listed");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, product.id);

    let all = service
        .execute(products::All::by(read::product::All))
        .await
        .expect("listed");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn vendor_cannot_create_products() {
    let (service, db, _) = service();

    let err = service
        .execute(CreateProduct {
            actor: db.vendor("Indore"),
            name: name("Onions"),
            description: None,
            image_url: None,
            search_keywords: None,
        })
        .await
        .expect_err("not a supplier");

    assert_eq!(err.kind(), Kind::Forbidden);
}

#[tokio::test]
async fn updates_only_provided_fields_of_own_product() {
    let (service, db, _) = service();
    let supplier = db.supplier("Ravi Traders");
    let product = service
        .execute(CreateProduct {
            actor: supplier.clone(),
            name: name("Onions"),
            description: product::Description::new("Red onions"),
            image_url: None,
            search_keywords: None,
        })
        .await
        .expect("product created");

    let updated = service
        .execute(UpdateProduct {
            actor: supplier,
            product_id: product.id,
            name: Some(name("Nashik Onions")),
            description: None,
            image_url: product::ImageUrl::new("https://img.example/onions.png"),
            search_keywords: None,
        })
        .await
        .expect("product updated");

    assert_eq!(AsRef::<str>::as_ref(&updated.name), "Nashik Onions");
    assert_eq!(
        updated.description.as_ref().map(ToString::to_string).as_deref(),
        Some("Red onions"),
    );
    assert!(updated.image_url.is_some());
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.created_at, product.created_at);
}

#[tokio::test]
async fn refuses_updating_foreign_or_missing_product() {
    let (service, db, _) = service();
    let owner = db.supplier("Ravi Traders");
    let product = db.product(&owner, "Onions");
    let update = |actor, product_id| UpdateProduct {
        actor,
        product_id,
        name: Some(name("Garlic")),
        description: None,
        image_url: None,
        search_keywords: None,
    };

    let err = service
        .execute(update(db.supplier("Mehta Wholesale"), product.id))
        .await
        .expect_err("not the owner");
    assert_eq!(err.kind(), Kind::Forbidden);

    let err = service
        .execute(update(owner, product::Id::new()))
        .await
        .expect_err("missing");
    assert_eq!(err.kind(), Kind::NotFound);
}

#[tokio::test]
async fn authorizes_valid_session() {
    let (service, db, _) = service();
    let vendor = db.vendor("Indore");

    let actor = service
        .execute(AuthorizeSession {
            token: token(vendor.id, Duration::from_secs(60))
                .parse()
                .expect("infallible"),
        })
        .await
        .expect("authorized");

    assert_eq!(actor.id, vendor.id);
    assert_eq!(actor.role, Role::Vendor);
    assert_eq!(
        actor.area_name.map(|a| a.to_string()).as_deref(),
        Some("Indore"),
    );
}

#[tokio::test]
async fn rejects_unknown_profile_and_garbage_tokens() {
    let (service, _, _) = service();

    let err = service
        .execute(AuthorizeSession {
            token: token(profile::Id::new(), Duration::from_secs(60))
                .parse()
                .expect("infallible"),
        })
        .await
        .expect_err("unknown profile");
    assert_eq!(err.kind(), Kind::NotFound);

    let err = service
        .execute(AuthorizeSession {
            token: "not.a.token".parse().expect("infallible"),
        })
        .await
        .expect_err("garbage");
    assert_eq!(err.kind(), Kind::InvalidInput);
}
