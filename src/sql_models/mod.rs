pub mod account;
pub mod leg;
pub mod plan;
pub mod stop;
