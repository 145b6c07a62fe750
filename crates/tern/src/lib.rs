pub mod bridge;
pub mod client;
pub mod dispatch;
pub mod errors;
pub mod extract;
pub mod models;
pub mod providers;
pub mod search;
