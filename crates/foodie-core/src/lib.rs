pub mod access;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod repository;

pub use error::{ErrorKind, FoodieError, FoodieResult};
