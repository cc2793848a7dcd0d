pub mod json;
pub mod sqlite;

use crate::error::StoreError;

pub use json::{read_pages, JsonFileProvider};
pub use sqlite::SqliteProvider;

/// Where page URLs come from and where found phones go.
///
/// Swapping storage means another implementation of this trait; the runner
/// and the extractor never see which one is in use.
pub trait DataProvider {
    /// Page URLs to scan, in source order.
    fn get_pages(&self) -> Result<Vec<String>, StoreError>;

    /// Deliver the final, deduplicated phone list. Called once per run.
    fn process_phone_numbers(&self, phones: &[String]) -> Result<(), StoreError>;
}
