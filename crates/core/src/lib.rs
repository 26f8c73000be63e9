//! Emporium Core - Shared types library.
//!
//! This crate provides the types exchanged between the Emporium components:
//! - `user-service`, `product-service`, `order-service` - the CRUD services
//! - `client` - typed HTTP clients and the checkout flow
//! - `cli` - migrations, seeding and probing
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Every service and every client agree on the wire format by
//! depending on it.
//!
//! # Modules
//!
//! - [`types`] - Type-safe ids and the transfer records for users, products
//!   and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
