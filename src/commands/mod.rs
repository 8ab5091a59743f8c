//! Command implementations for kotoba

pub mod counts;
pub mod delete;
pub mod dispatch;
pub mod import;
pub mod list;
pub mod lookup;
pub mod purge;
