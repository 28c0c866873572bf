pub mod store;
pub use store::{CatalogStore, QuoteStore, QuoteUnitOfWork};
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod quote_repo;
pub use quote_repo::QuoteRepository;
pub mod unconfigured;
pub use unconfigured::UnconfiguredStore;

#[cfg(test)]
pub mod memory_store;
#[cfg(test)]
pub use memory_store::MemoryStore;
