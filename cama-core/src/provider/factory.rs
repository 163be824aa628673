//! Opening a reference-data source by name.
//!
//! Reference tables for every municipality and effective year live under one
//! root, in a store of some kind. [`ProviderConfig`] names the kind of store
//! and where its root is. [`ProviderRegistry`] holds one [`ProviderFactory`]
//! per kind and opens the matching provider.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::repository::{ProviderError, ReferenceDataProvider};

/// Where a valuation run reads its reference data from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Kind of store, e.g. `"csv"`.
    pub backend: String,
    /// Root of the reference tree, as the backend understands it. For `csv`
    /// this is the directory holding one subdirectory per municipality.
    pub location: String,
}

impl ProviderConfig {
    pub fn new(
        backend: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            location: location.into(),
        }
    }
}

/// Opens providers for one kind of reference store.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// Name this store is selected by in [`ProviderConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Opens the reference tree rooted at `location`. Fails with
    /// [`ProviderError::Configuration`] when there is no usable tree there.
    async fn open(
        &self,
        location: &str,
    ) -> Result<Box<dyn ReferenceDataProvider>, ProviderError>;
}

/// The reference stores a run can choose between.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a store. A later factory with the same name replaces the earlier.
    pub fn register<F>(
        &mut self,
        factory: F,
    ) where
        F: ProviderFactory + 'static,
    {
        self.factories.insert(factory.backend_name(), Box::new(factory));
    }

    /// Registered store names in sorted order.
    pub fn backends(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Opens the reference tree `config` points at.
    pub async fn open(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ReferenceDataProvider>, ProviderError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            let known: Vec<&str> = self.backends().collect();
            return Err(ProviderError::Configuration(format!(
                "no reference store named '{}' (known: {})",
                config.backend,
                known.join(", ")
            )));
        };

        factory.open(&config.location).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ReferenceData;
    use crate::provider::StaticReferenceProvider;

    /// Serves one fixed year and remembers which roots it was asked to open.
    struct InMemoryStore {
        name: &'static str,
        opened: Arc<Mutex<Vec<String>>>,
    }

    impl InMemoryStore {
        fn new(name: &'static str) -> (Self, Arc<Mutex<Vec<String>>>) {
            let opened = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    name,
                    opened: opened.clone(),
                },
                opened,
            )
        }
    }

    #[async_trait]
    impl ProviderFactory for InMemoryStore {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn open(
            &self,
            location: &str,
        ) -> Result<Box<dyn ReferenceDataProvider>, ProviderError> {
            self.opened.lock().unwrap().push(location.to_string());
            let mut provider = StaticReferenceProvider::new();
            provider.insert("springfield", 2024, ReferenceData::default());
            Ok(Box::new(provider))
        }
    }

    struct UnreachableStore;

    #[async_trait]
    impl ProviderFactory for UnreachableStore {
        fn backend_name(&self) -> &'static str {
            "remote"
        }

        async fn open(
            &self,
            location: &str,
        ) -> Result<Box<dyn ReferenceDataProvider>, ProviderError> {
            Err(ProviderError::Configuration(format!("{location} is unreachable")))
        }
    }

    #[test]
    fn backends_are_listed_in_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(InMemoryStore::new("memory").0);
        registry.register(UnreachableStore);
        registry.register(InMemoryStore::new("csv").0);

        assert_eq!(registry.backends().collect::<Vec<_>>(), vec!["csv", "memory", "remote"]);
    }

    #[tokio::test]
    async fn open_passes_location_to_matching_store() {
        let mut registry = ProviderRegistry::new();
        let (csv, csv_opened) = InMemoryStore::new("csv");
        let (memory, memory_opened) = InMemoryStore::new("memory");
        registry.register(csv);
        registry.register(memory);

        let provider = registry
            .open(&ProviderConfig::new("memory", "/srv/cama/reference"))
            .await
            .expect("memory store opens");

        assert_eq!(*memory_opened.lock().unwrap(), vec!["/srv/cama/reference".to_string()]);
        assert!(csv_opened.lock().unwrap().is_empty());
        assert_eq!(
            provider.list_effective_years("springfield").await,
            Ok(vec![2024])
        );
    }

    #[tokio::test]
    async fn open_unknown_store_names_known_ones() {
        let mut registry = ProviderRegistry::new();
        registry.register(InMemoryStore::new("csv").0);

        let result = registry.open(&ProviderConfig::new("postgres", "cama")).await;

        let Err(ProviderError::Configuration(message)) = result else {
            panic!("expected a configuration error");
        };
        assert_eq!(message, "no reference store named 'postgres' (known: csv)");
    }

    #[tokio::test]
    async fn open_surfaces_store_errors() {
        let mut registry = ProviderRegistry::new();
        registry.register(UnreachableStore);

        let result = registry.open(&ProviderConfig::new("remote", "cama.example")).await;

        assert!(matches!(
            result,
            Err(ProviderError::Configuration(message)) if message == "cama.example is unreachable"
        ));
    }
}
