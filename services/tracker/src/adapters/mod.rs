pub mod db;
pub mod memory;

pub use db::PgProgressStore;
pub use memory::MemoryProgressStore;
