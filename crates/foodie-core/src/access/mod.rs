//! Access control: what a role may do, which rows an identity may see,
//! and the guard that composes the two.
//!
//! Every check here is a pure function of an explicit [`Identity`] and
//! the entity in question. Nothing reads ambient request state.
//!
//! [`Identity`]: crate::models::user::Identity

pub mod capability;
pub mod guard;
pub mod scope;

pub use capability::{Action, capable};
pub use guard::{Decision, DenyReason, authorize, authorize_edit};
pub use scope::{Global, ScopedEntity, Visibility, filter_collection, in_scope};
