pub mod client;
pub mod query;

pub use client::Backend;
pub use query::Query;
