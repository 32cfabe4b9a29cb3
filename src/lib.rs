pub mod api;
pub mod auction;
pub mod config;
pub mod error;
pub mod listing;
pub mod scheduler;
pub mod search;
pub mod session;
pub mod wizard;
