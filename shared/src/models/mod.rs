//! Domain models shared between server and clients

pub mod coupon;
pub mod customer;
pub mod order;
pub mod product;
pub mod variant;

pub use coupon::{Coupon, DiscountType};
pub use customer::{CashbackBalance, CashbackEntry, CashbackKind, Customer};
pub use order::{
    DeliveryType, Order, OrderDetail, OrderItem, OrderItemDetail, OrderItemOption,
    OrderItemVariant, OrderItemVariantDetail,
};
pub use product::Product;
pub use variant::{VariantGroup, VariantGroupRule, VariantOption};
