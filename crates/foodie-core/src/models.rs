//! Domain models for Foodie.
//!
//! These are the core types shared across all crates.

pub mod country;
pub mod menu_item;
pub mod order;
pub mod payment_method;
pub mod restaurant;
pub mod session;
pub mod user;
