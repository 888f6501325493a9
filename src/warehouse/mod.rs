mod models;
mod schema;
mod store;

pub use models::{ArtistRow, SongRow, Songplay, TableCounts, TimeRow, UserRow};
pub use schema::WAREHOUSE_SCHEMA;
pub use store::{Warehouse, WarehouseTx};
