//! Pure Rust async implementation of the [SA-MP Query Mechanism](https://sampwiki.blast.hk/wiki/Query_Mechanism)
pub mod error;
pub mod info;
pub mod packet;
pub mod players;
pub mod query;
pub mod rules;
mod parse;

pub use query::SampQuery;
