mod sqlite;
mod weather_data;

pub use sqlite::SqliteRepository;
pub use weather_data::*;
