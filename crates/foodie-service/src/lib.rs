//! Foodie services: the operations a caller performs on behalf of an
//! authenticated [`Identity`](foodie_core::models::user::Identity).
//!
//! Every entry point takes the identity explicitly, runs it through the
//! authorization guard, and only then touches the repositories.

pub mod admin;
pub mod orders;
pub mod restaurants;

pub use admin::{AdminService, Dashboard};
pub use orders::OrderService;
pub use restaurants::{RestaurantMenu, RestaurantService};
