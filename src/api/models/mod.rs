pub mod entries;

pub use entries::{CreateEntryRequest, EntryResponse, UpdateEntryRequest};
