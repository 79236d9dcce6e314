pub mod account;
pub mod plan;
