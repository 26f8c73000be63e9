//! Core types for Emporium.
//!
//! Transfer records are the externally visible shape of each entity. They are
//! distinct from the persisted rows each service keeps privately.

pub mod collection;
pub mod decimal;
pub mod id;
pub mod order;
pub mod product;
pub mod user;

pub use collection::{Collection, ErrorBody};
pub use id::*;
pub use order::{CartRef, OrderDate, OrderDateError, OrderDto};
pub use product::ProductDto;
pub use user::UserDto;
