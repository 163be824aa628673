pub mod calculations;
pub mod models;
pub mod provider;
pub mod reference;

pub use calculations::{LandLineError, LandValuationCalculator};
pub use models::*;
pub use provider::{ProviderError, ReferenceDataProvider};
pub use reference::ReferenceIndex;
