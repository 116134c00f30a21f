pub mod csv_storage;
pub mod database;
pub mod journal;
pub mod models;
pub mod repositories;

pub use csv_storage::CsvStorage;
pub use database::DatabaseClient;
pub use journal::EventJournal;
pub use repositories::{
    ExceptionRepository, MatchResultRepository, PolicyEventRepository, TradeRepository,
};
