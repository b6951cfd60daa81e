pub mod balance_cache;
pub mod sql;
