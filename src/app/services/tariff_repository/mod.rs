//! Tariff persistence for imported tariff batches
//!
//! This module defines the storage boundary the importer and the query
//! service talk to, and an in-memory implementation that can persist itself
//! as a JSON snapshot between runs.
//!
//! Saving is where tariffs receive durable identity and where the reference
//! values they carry (country, staging basket, product type) are reconciled
//! against the canonical records already in the store.

pub mod memory;


use async_trait::async_trait;

use crate::Result;
use crate::app::models::{Page, PageRequest, StagingBasket, Tariff};

pub use memory::InMemoryTariffRepository;

/// Outcome of replacing one country's tariffs
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    /// Tariffs the country had before the replacement
    pub removed: usize,
    /// The new batch, with durable ids and reconciled references
    pub saved: Vec<Tariff>,
}

/// Storage for translated tariffs
///
/// All queries return tariffs ordered by their durable id, which follows save
/// order and therefore source row order within one batch.
#[async_trait]
pub trait TariffRepository: Send + Sync {
    /// Save a batch, assigning durable ids and reconciling references
    async fn save_all(&self, tariffs: Vec<Tariff>) -> Result<Vec<Tariff>>;

    /// Remove every tariff of a country, returning how many were removed
    async fn delete_by_country_code(&self, country_code: &str) -> Result<usize>;

    /// Swap a country's tariffs for a new batch in one step
    ///
    /// Readers never observe the country without tariffs, and a failure
    /// leaves the previous tariffs in place.
    async fn replace_country_tariffs(
        &self,
        country_code: &str,
        tariffs: Vec<Tariff>,
    ) -> Result<Replacement>;

    async fn find_by_country_code(
        &self,
        country_code: &str,
        page: PageRequest,
    ) -> Result<Page<Tariff>>;

    async fn find_by_country_code_and_staging_basket_id(
        &self,
        country_code: &str,
        staging_basket_id: i64,
        page: PageRequest,
    ) -> Result<Page<Tariff>>;

    /// Distinct staging baskets used by a country's tariffs, ordered by id
    async fn find_all_staging_baskets_by_country(
        &self,
        country_code: &str,
    ) -> Result<Vec<StagingBasket>>;

    async fn count_by_country_code(&self, country_code: &str) -> Result<usize>;
}
