//! In-memory fakes of the [`Database`] and [`Llm`] for exercising the
//! [`Service`] without external dependencies.

#![allow(dead_code, reason = "every test binary uses its own subset")]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use common::{
    operations::{By, Commit, Insert, Lock, Perform, Select, Transact, Update},
    DateTime,
};
use rust_decimal::Decimal;
use service::{
    domain::{
        group_buy, order, product,
        profile::{self, AreaName, FullName, Role},
        Actor, GroupBuy, Order, Product, Profile,
    },
    infra::{
        database,
        llm::{self, Prompt},
        Database, Llm,
    },
    read::{
        self,
        group_buy::{ActiveIn, ActiveOf, Listing, Recent, TotalCount},
        order::{Committed, Detailed, Owned},
    },
    Config, Service,
};
use tracerr::Traced;

/// [`Service`] wired with the in-memory fakes.
pub type TestService = Service<MemoryDb, ScriptedLlm>;

/// Secret the [`Config`] of a [`TestService`] verifies tokens with.
pub const JWT_SECRET: &[u8] = b"test-secret";

/// Name of the unique index guarding one live [`Order`] per vendor and
/// [`GroupBuy`].
pub const LIVE_COMMITMENT_INDEX: &str = "orders_live_commitment_idx";

/// Creates a new [`TestService`] along with handles to its fakes.
pub fn service() -> (TestService, MemoryDb, ScriptedLlm) {
    let db = MemoryDb::default();
    let llm = ScriptedLlm::default();
    let service = Service::new(
        Config::hs256(JWT_SECRET, None),
        db.clone(),
        llm.clone(),
    );
    (service, db, llm)
}

/// Shorthand for a [`Decimal`] out of an integer.
pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// Shorthand for an [`AreaName`].
pub fn area(name: &str) -> AreaName {
    AreaName::new(name).expect("valid area name")
}

/// Shorthand for a [`DateTime`] shifted from now by the provided number of
/// minutes.
pub fn minutes_ago(minutes: u64) -> DateTime {
    DateTime::now() - Duration::from_secs(minutes * 60)
}

/// Shorthand for a [`group_buy::EndDateTime`] the provided number of days
/// ahead.
pub fn in_days(days: u64) -> group_buy::EndDateTime {
    (DateTime::now() + Duration::from_secs(days * 24 * 60 * 60)).coerce()
}

#[derive(Clone, Debug, Default)]
struct State {
    profiles: Vec<Profile>,
    products: Vec<Product>,
    group_buys: Vec<GroupBuy>,
    orders: Vec<Order>,
}

impl State {
    fn listing(&self, group_buy: &GroupBuy) -> Option<Listing> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == group_buy.product_id)?
            .clone();
        let supplier_name = self
            .profiles
            .iter()
            .find(|p| p.id == group_buy.supplier_id)
            .and_then(|p| p.full_name.clone());
        Some(Listing {
            group_buy: group_buy.clone(),
            product,
            supplier_name,
        })
    }
}

/// In-memory [`Database`] sharing its state between clones.
///
/// A [`Transact`]ion works on a snapshot of the state, which replaces the
/// shared one only on [`Commit`]. Dropping it uncommitted discards its writes.
#[derive(Clone, Debug, Default)]
pub struct MemoryDb {
    /// Committed state shared between clones.
    committed: Arc<Mutex<State>>,

    /// Snapshot written by an ongoing [`Transact`]ion, if any.
    tx: Option<Arc<Mutex<State>>>,

    /// Whether every [`Update`] of a [`GroupBuy`] fails.
    broken_group_buy_updates: Arc<AtomicBool>,
}

impl MemoryDb {
    fn state(&self) -> MutexGuard<'_, State> {
        self.tx
            .as_ref()
            .unwrap_or(&self.committed)
            .lock()
            .expect("not poisoned")
    }

    /// Makes every following [`Update`] of a [`GroupBuy`] fail.
    pub fn break_group_buy_updates(&self) {
        self.broken_group_buy_updates.store(true, Ordering::SeqCst);
    }

    /// Stores a new [`Profile`] and returns it as an [`Actor`].
    pub fn add_profile(
        &self,
        role: Role,
        full_name: &str,
        area_name: Option<&str>,
    ) -> Actor {
        let profile = Profile {
            id: profile::Id::new(),
            role,
            full_name: FullName::new(full_name),
            area_name: area_name.map(area),
        };
        self.state().profiles.push(profile.clone());
        profile.into()
    }

    /// Stores a new supplier [`Profile`].
    pub fn supplier(&self, full_name: &str) -> Actor {
        self.add_profile(Role::Supplier, full_name, None)
    }

    /// Stores a new vendor [`Profile`] operating in the provided area.
    pub fn vendor(&self, area_name: &str) -> Actor {
        self.add_profile(Role::Vendor, "Street Vendor", Some(area_name))
    }

    /// Stores a new [`Product`] of the provided supplier.
    pub fn product(&self, supplier: &Actor, name: &str) -> Product {
        let product = Product {
            id: product::Id::new(),
            supplier_id: supplier.id,
            name: product::Name::new(name).expect("valid product name"),
            description: None,
            image_url: None,
            search_keywords: None,
            created_at: DateTime::now().coerce(),
            updated_at: None,
        };
        self.state().products.push(product.clone());
        product
    }

    /// Stores a new active [`GroupBuy`] of the provided [`Product`].
    pub fn group_buy(
        &self,
        product: &Product,
        area_name: &str,
        end_date: group_buy::EndDateTime,
    ) -> GroupBuy {
        self.group_buy_created_at(product, area_name, end_date, DateTime::now())
    }

    /// Stores a new active [`GroupBuy`] created at the provided moment.
    pub fn group_buy_created_at(
        &self,
        product: &Product,
        area_name: &str,
        end_date: group_buy::EndDateTime,
        created_at: DateTime,
    ) -> GroupBuy {
        let group_buy = GroupBuy {
            id: group_buy::Id::new(),
            supplier_id: product.supplier_id,
            product_id: product.id,
            title: None,
            target_quantity: group_buy::Quantity::new(dec(100))
                .expect("non-negative"),
            current_quantity: group_buy::Quantity::ZERO,
            price_per_unit: group_buy::Price::new(dec(20))
                .expect("non-negative"),
            status: group_buy::Status::Active,
            area_name: area(area_name),
            end_date,
            created_at: created_at.coerce(),
        };
        self.state().group_buys.push(group_buy.clone());
        group_buy
    }

    /// Stores a new placed [`Order`] created at the provided moment, updating
    /// the committed quantity of its [`GroupBuy`].
    pub fn order_at(
        &self,
        vendor: &Actor,
        group_buy_id: group_buy::Id,
        quantity: i64,
        created_at: DateTime,
    ) -> Order {
        let quantity =
            order::Quantity::new(dec(quantity)).expect("positive quantity");
        let order = Order {
            id: order::Id::new(),
            vendor_id: vendor.id,
            group_buy_id,
            quantity,
            status: order::Status::Placed,
            created_at: created_at.coerce(),
        };
        let mut state = self.state();
        if let Some(g) =
            state.group_buys.iter_mut().find(|g| g.id == group_buy_id)
        {
            g.commit(quantity).expect("representable quantity");
        }
        state.orders.push(order.clone());
        order
    }

    /// Returns all the stored [`Order`]s.
    pub fn orders(&self) -> Vec<Order> {
        self.state().orders.clone()
    }

    /// Returns all the stored [`GroupBuy`]s.
    pub fn group_buys(&self) -> Vec<GroupBuy> {
        self.state().group_buys.clone()
    }

    /// Returns the stored [`Order`] with the provided ID.
    pub fn order(&self, id: order::Id) -> Order {
        self.orders()
            .into_iter()
            .find(|o| o.id == id)
            .expect("order exists")
    }

    /// Returns the stored [`GroupBuy`] with the provided ID.
    pub fn find_group_buy(&self, id: group_buy::Id) -> GroupBuy {
        self.group_buys()
            .into_iter()
            .find(|g| g.id == id)
            .expect("group buy exists")
    }
}

impl Database<Transact> for MemoryDb {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let snapshot = self.state().clone();
        Ok(Self {
            tx: Some(Arc::new(Mutex::new(snapshot))),
            ..self.clone()
        })
    }
}

impl Database<Commit> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        if self.tx.is_some() {
            let snapshot = self.state().clone();
            *self.committed.lock().expect("not poisoned") = snapshot;
        }
        Ok(())
    }
}

impl Database<Select<By<Option<Profile>, profile::Id>>> for MemoryDb {
    type Ok = Option<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Profile>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().profiles.iter().find(|p| p.id == id).cloned())
    }
}

impl Database<Select<By<Option<Product>, product::Id>>> for MemoryDb {
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().products.iter().find(|p| p.id == id).cloned())
    }
}

fn newest_products<'a>(
    products: impl Iterator<Item = &'a Product>,
) -> Vec<Product> {
    let mut products = products.cloned().collect::<Vec<_>>();
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    products
}

impl Database<Select<By<Vec<Product>, read::product::All>>> for MemoryDb {
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Product>, read::product::All>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(newest_products(self.state().products.iter()))
    }
}

impl Database<Select<By<Vec<Product>, profile::Id>>> for MemoryDb {
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Product>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id = by.into_inner();
        Ok(newest_products(
            self.state()
                .products
                .iter()
                .filter(|p| p.supplier_id == supplier_id),
        ))
    }
}

impl Database<Select<By<Vec<Product>, product::NameFragment>>> for MemoryDb {
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Product>, product::NameFragment>>,
    ) -> Result<Self::Ok, Self::Err> {
        let fragment = by.into_inner();
        Ok(newest_products(
            self.state()
                .products
                .iter()
                .filter(|p| fragment.matches(&p.name)),
        ))
    }
}

impl Database<Insert<Product>> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(product): Insert<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().products.push(product);
        Ok(())
    }
}

impl Database<Update<Product>> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        let stored = state
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| tracerr::new!(database::Error::NotFound))?;
        *stored = product;
        Ok(())
    }
}

impl Database<Select<By<Option<GroupBuy>, group_buy::Id>>> for MemoryDb {
    type Ok = Option<GroupBuy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<GroupBuy>, group_buy::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().group_buys.iter().find(|g| g.id == id).cloned())
    }
}

impl Database<Lock<By<GroupBuy, group_buy::Id>>> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<GroupBuy, group_buy::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Vec<GroupBuy>, ActiveOf>>> for MemoryDb {
    type Ok = Vec<GroupBuy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<GroupBuy>, ActiveOf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ActiveOf(product_id) = by.into_inner();
        let mut found = self
            .state()
            .group_buys
            .iter()
            .filter(|g| g.product_id == product_id && g.is_active())
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| a.end_date.cmp(&b.end_date));
        Ok(found)
    }
}

impl Database<Select<By<Vec<GroupBuy>, Recent>>> for MemoryDb {
    type Ok = Vec<GroupBuy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<GroupBuy>, Recent>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Recent { supplier_id, limit } = by.into_inner();
        let mut found = self
            .state()
            .group_buys
            .iter()
            .filter(|g| g.supplier_id == supplier_id)
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit.into());
        Ok(found)
    }
}

impl Database<Select<By<TotalCount, profile::Id>>> for MemoryDb {
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id = by.into_inner();
        let count = self
            .state()
            .group_buys
            .iter()
            .filter(|g| g.supplier_id == supplier_id)
            .count();
        Ok(TotalCount::from(u64::try_from(count).expect("fits")))
    }
}

impl Database<Select<By<Option<Listing>, group_buy::Id>>> for MemoryDb {
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, group_buy::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let state = self.state();
        Ok(state
            .group_buys
            .iter()
            .find(|g| g.id == id)
            .and_then(|g| state.listing(g)))
    }
}

impl Database<Select<By<Vec<Listing>, ActiveIn>>> for MemoryDb {
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, ActiveIn>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ActiveIn(area_name) = by.into_inner();
        let state = self.state();
        let mut found = state
            .group_buys
            .iter()
            .filter(|g| g.is_active() && g.area_name == area_name)
            .filter_map(|g| state.listing(g))
            .collect::<Vec<_>>();
        found.sort_by(|a, b| a.group_buy.end_date.cmp(&b.group_buy.end_date));
        Ok(found)
    }
}

impl Database<Select<By<Vec<Listing>, profile::Id>>> for MemoryDb {
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id = by.into_inner();
        let state = self.state();
        let mut found = state
            .group_buys
            .iter()
            .filter(|g| g.supplier_id == supplier_id)
            .filter_map(|g| state.listing(g))
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            b.group_buy.created_at.cmp(&a.group_buy.created_at)
        });
        Ok(found)
    }
}

impl Database<Insert<GroupBuy>> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(group_buy): Insert<GroupBuy>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().group_buys.push(group_buy);
        Ok(())
    }
}

impl Database<Update<GroupBuy>> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(group_buy): Update<GroupBuy>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.broken_group_buy_updates.load(Ordering::SeqCst) {
            return Err(tracerr::new!(database::Error::NotFound));
        }
        let mut state = self.state();
        let stored = state
            .group_buys
            .iter_mut()
            .find(|g| g.id == group_buy.id)
            .ok_or_else(|| tracerr::new!(database::Error::NotFound))?;
        *stored = group_buy;
        Ok(())
    }
}

impl Database<Select<By<Option<Order>, Owned>>> for MemoryDb {
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned { id, vendor_id } = by.into_inner();
        Ok(self
            .state()
            .orders
            .iter()
            .find(|o| o.id == id && o.vendor_id == vendor_id)
            .cloned())
    }
}

impl Database<Select<By<Vec<Detailed>, profile::Id>>> for MemoryDb {
    type Ok = Vec<Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Detailed>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let vendor_id = by.into_inner();
        let state = self.state();
        let mut found = state
            .orders
            .iter()
            .filter(|o| o.vendor_id == vendor_id)
            .filter_map(|o| {
                let listing = state.listing(
                    state.group_buys.iter().find(|g| g.id == o.group_buy_id)?,
                )?;
                Some(Detailed {
                    order: o.clone(),
                    group_buy: listing.group_buy,
                    product: listing.product,
                })
            })
            .collect::<Vec<_>>();
        found.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
        Ok(found)
    }
}

impl Database<Select<By<HashMap<group_buy::Id, group_buy::Quantity>, Committed>>>
    for MemoryDb
{
    type Ok = HashMap<group_buy::Id, group_buy::Quantity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<group_buy::Id, group_buy::Quantity>, Committed>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let Committed(ids) = by.into_inner();
        let mut sums = HashMap::new();
        for o in self.state().orders.iter().filter(|o| o.is_live()) {
            if ids.contains(&o.group_buy_id) {
                let sum = sums
                    .entry(o.group_buy_id)
                    .or_insert(group_buy::Quantity::ZERO);
                *sum = *sum + o.quantity;
            }
        }
        Ok(sums)
    }
}

impl Database<Insert<Order>> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        let duplicate = state.orders.iter().any(|o| {
            o.is_live()
                && o.vendor_id == order.vendor_id
                && o.group_buy_id == order.group_buy_id
        });
        if duplicate {
            return Err(tracerr::new!(database::Error::UniqueViolation(
                LIVE_COMMITMENT_INDEX.into(),
            )));
        }
        state.orders.push(order);
        Ok(())
    }
}

impl Database<Update<Order>> for MemoryDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        let stored = state
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or_else(|| tracerr::new!(database::Error::NotFound))?;
        *stored = order;
        Ok(())
    }
}

/// [`Llm`] answering with pre-scripted replies, in order.
///
/// Fails with [`llm::Error::NoCandidates`] once the replies run out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedLlm {
    replies: Arc<Mutex<VecDeque<Result<String, ()>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    /// Scripts the next reply.
    pub fn reply(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .expect("not poisoned")
            .push_back(Ok(text.into()));
    }

    /// Scripts the next request to fail.
    pub fn fail(&self) {
        self.replies.lock().expect("not poisoned").push_back(Err(()));
    }

    /// Returns all the received prompts.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("not poisoned").clone()
    }
}

impl Llm<Perform<Prompt>> for ScriptedLlm {
    type Ok = String;
    type Err = Traced<llm::Error>;

    async fn execute(
        &self,
        Perform(prompt): Perform<Prompt>,
    ) -> Result<Self::Ok, Self::Err> {
        self.prompts
            .lock()
            .expect("not poisoned")
            .push(prompt.text().to_owned());
        match self.replies.lock().expect("not poisoned").pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(())) => Err(tracerr::new!(llm::Error::Unconfigured)),
            None => Err(tracerr::new!(llm::Error::NoCandidates)),
        }
    }
}
