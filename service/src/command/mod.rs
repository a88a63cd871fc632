//! [`Command`] definition.

pub mod authorize_session;
pub mod cancel_order;
pub mod close_group_buy;
pub mod create_group_buy;
pub mod create_product;
pub mod parse_order;
pub mod place_order;
pub mod place_order_from_text;
pub mod update_product;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_session::AuthorizeSession, cancel_order::CancelOrder,
    close_group_buy::CloseGroupBuy, create_group_buy::CreateGroupBuy,
    create_product::CreateProduct, parse_order::ParseOrder,
    place_order::PlaceOrder, place_order_from_text::PlaceOrderFromText,
    update_product::UpdateProduct,
};
