//! Table structure models: columns, keys, indexes and the enclosing
//! structure consulted during rendering.

pub mod column;
pub mod factory;
pub mod foreign_key;
pub mod index;
pub mod primary_key;
pub mod structure;
