pub mod account;
pub mod lenient;
pub mod listing;
pub mod pricing;
pub mod search;
