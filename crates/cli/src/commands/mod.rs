pub mod checkout;
pub mod migrate;
pub mod probe;
pub mod seed;
