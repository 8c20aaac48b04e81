//! Dashboard, Gantt and map views. Read-only aggregations over the registry.

pub mod gantt;
pub mod handlers;
pub mod map;
pub mod summary;
