pub mod db;
pub mod denorm;
pub mod load;
pub mod query;
pub mod tables;

pub use db::open_db;
pub use denorm::{build_ghrp, count_ghrp, query_ghrp, GhrpFilter, GhrpRow};
pub use load::{load_delimited, load_f02, load_ghr, LoadError};
pub use tables::{schema_for, Column, ColumnType, TableSchema};
