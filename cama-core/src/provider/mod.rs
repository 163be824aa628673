pub mod factory;
pub mod repository;

pub use factory::{ProviderConfig, ProviderFactory, ProviderRegistry};
pub use repository::{ProviderError, ReferenceDataProvider, StaticReferenceProvider};
