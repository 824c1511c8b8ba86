//! In-memory tariff repository with JSON snapshot persistence

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{Replacement, TariffRepository};
use crate::app::models::{Country, Page, PageRequest, ProductType, StagingBasket, Tariff};
use crate::{Error, Result};

/// Complete repository contents, as written to a snapshot file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryState {
    next_tariff_id: i64,
    next_country_id: i64,
    /// Canonical countries by code
    countries: BTreeMap<String, Country>,
    /// Canonical staging baskets by id
    staging_baskets: BTreeMap<i64, StagingBasket>,
    /// Canonical product types by id
    product_types: BTreeMap<i64, ProductType>,
    /// Saved tariffs in id order
    tariffs: Vec<Tariff>,
}

impl RepositoryState {
    fn allocate_tariff_id(&mut self) -> i64 {
        self.next_tariff_id += 1;
        self.next_tariff_id
    }

    fn reconcile_country(&mut self, country: &Country) -> Country {
        if let Some(canonical) = self.countries.get(&country.code) {
            return canonical.clone();
        }

        self.next_country_id += 1;
        let registered = Country {
            id: Some(self.next_country_id),
            code: country.code.clone(),
            name: country.name.clone(),
        };
        debug!("Registered country {} with id {}", registered.code, self.next_country_id);
        self.countries.insert(registered.code.clone(), registered.clone());
        registered
    }

    fn reconcile_staging_basket(&mut self, basket: &StagingBasket) -> StagingBasket {
        let canonical = self
            .staging_baskets
            .entry(basket.id)
            .or_insert_with(|| basket.clone());
        if basket.name.is_some() {
            canonical.name = basket.name.clone();
        }
        canonical.clone()
    }

    fn reconcile_product_type(&mut self, product_type: &ProductType) -> ProductType {
        let canonical = self
            .product_types
            .entry(product_type.id)
            .or_insert_with(|| product_type.clone());
        if product_type.name.is_some() {
            canonical.name = product_type.name.clone();
        }
        canonical.clone()
    }

    fn insert_batch(&mut self, tariffs: Vec<Tariff>) -> Vec<Tariff> {
        let mut saved = Vec::with_capacity(tariffs.len());
        for mut tariff in tariffs {
            tariff.id = Some(self.allocate_tariff_id());
            tariff.country = self.reconcile_country(&tariff.country);
            tariff.staging_basket = self.reconcile_staging_basket(&tariff.staging_basket);
            tariff.product_type = self.reconcile_product_type(&tariff.product_type);
            self.tariffs.push(tariff.clone());
            saved.push(tariff);
        }
        saved
    }

    fn remove_country(&mut self, country_code: &str) -> usize {
        let before = self.tariffs.len();
        self.tariffs.retain(|tariff| tariff.country.code != country_code);
        before - self.tariffs.len()
    }

    fn tariffs_for<'a>(&'a self, country_code: &'a str) -> impl Iterator<Item = &'a Tariff> + 'a {
        self.tariffs
            .iter()
            .filter(move |tariff| tariff.country.code == country_code)
    }
}

/// Tariff repository held in memory
///
/// Writers are serialized through an async `RwLock`; readers see either the
/// state before or after a whole batch.
#[derive(Debug, Default)]
pub struct InMemoryTariffRepository {
    state: RwLock<RepositoryState>,
}

impl InMemoryTariffRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a repository from a snapshot file; a missing file gives an empty store
    pub async fn load_snapshot(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path)
            .await
            .map_err(|e| Error::io(format!("Failed to check snapshot {}", path.display()), e))?
        {
            info!("No repository snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(format!("Failed to read snapshot {}", path.display()), e))?;
        let state: RepositoryState = serde_json::from_str(&content).map_err(|e| {
            Error::serialization(format!("Invalid repository snapshot {}", path.display()), e)
        })?;

        info!(
            "Loaded {} tariffs from snapshot {}",
            state.tariffs.len(),
            path.display()
        );
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Write the whole repository to a snapshot file, replacing it atomically
    pub async fn write_snapshot(&self, path: &Path) -> Result<()> {
        let json = {
            let state = self.state.read().await;
            serde_json::to_vec_pretty(&*state)
                .map_err(|e| Error::serialization("Failed to serialize repository", e))?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
        }

        let partial = path.with_extension("json.partial");
        tokio::fs::write(&partial, &json)
            .await
            .map_err(|e| Error::io(format!("Failed to write {}", partial.display()), e))?;
        tokio::fs::rename(&partial, path)
            .await
            .map_err(|e| Error::io(format!("Failed to replace {}", path.display()), e))?;

        debug!("Wrote repository snapshot to {}", path.display());
        Ok(())
    }

    /// Canonical country record for a code
    pub async fn country(&self, country_code: &str) -> Option<Country> {
        self.state.read().await.countries.get(country_code).cloned()
    }

    /// Register catalogue countries so imports pick up their ids and names
    pub async fn register_countries(&self, countries: &[Country]) {
        let mut state = self.state.write().await;
        for country in countries {
            let id = match country.id {
                Some(id) => id,
                None => {
                    state.next_country_id += 1;
                    state.next_country_id
                }
            };
            state.next_country_id = state.next_country_id.max(id);
            state.countries.insert(
                country.code.clone(),
                Country {
                    id: Some(id),
                    code: country.code.clone(),
                    name: country.name.clone(),
                },
            );
        }
    }

    pub async fn total_tariffs(&self) -> usize {
        self.state.read().await.tariffs.len()
    }
}

#[async_trait]
impl TariffRepository for InMemoryTariffRepository {
    async fn save_all(&self, tariffs: Vec<Tariff>) -> Result<Vec<Tariff>> {
        let saved = self.state.write().await.insert_batch(tariffs);

        debug!("Saved {} tariffs", saved.len());
        Ok(saved)
    }

    async fn delete_by_country_code(&self, country_code: &str) -> Result<usize> {
        let removed = self.state.write().await.remove_country(country_code);

        debug!("Deleted {} tariffs for {}", removed, country_code);
        Ok(removed)
    }

    async fn replace_country_tariffs(
        &self,
        country_code: &str,
        tariffs: Vec<Tariff>,
    ) -> Result<Replacement> {
        let mut state = self.state.write().await;
        let removed = state.remove_country(country_code);
        let saved = state.insert_batch(tariffs);

        debug!(
            "Replaced {} tariffs for {} with {}",
            removed,
            country_code,
            saved.len()
        );
        Ok(Replacement { removed, saved })
    }

    async fn find_by_country_code(
        &self,
        country_code: &str,
        page: PageRequest,
    ) -> Result<Page<Tariff>> {
        let state = self.state.read().await;
        let matching: Vec<Tariff> = state.tariffs_for(country_code).cloned().collect();
        Ok(Page::from_slice(&matching, page))
    }

    async fn find_by_country_code_and_staging_basket_id(
        &self,
        country_code: &str,
        staging_basket_id: i64,
        page: PageRequest,
    ) -> Result<Page<Tariff>> {
        let state = self.state.read().await;
        let matching: Vec<Tariff> = state
            .tariffs_for(country_code)
            .filter(|tariff| tariff.staging_basket.id == staging_basket_id)
            .cloned()
            .collect();
        Ok(Page::from_slice(&matching, page))
    }

    async fn find_all_staging_baskets_by_country(
        &self,
        country_code: &str,
    ) -> Result<Vec<StagingBasket>> {
        let state = self.state.read().await;
        let baskets: BTreeMap<i64, StagingBasket> = state
            .tariffs_for(country_code)
            .map(|tariff| {
                let basket = state
                    .staging_baskets
                    .get(&tariff.staging_basket.id)
                    .unwrap_or(&tariff.staging_basket);
                (basket.id, basket.clone())
            })
            .collect();
        Ok(baskets.into_values().collect())
    }

    async fn count_by_country_code(&self, country_code: &str) -> Result<usize> {
        Ok(self.state.read().await.tariffs_for(country_code).count())
    }
}
