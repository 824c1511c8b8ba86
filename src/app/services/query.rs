//! Paginated tariff queries

use std::sync::Arc;
use tracing::debug;

use crate::Result;
use crate::app::models::{Page, PageRequest, StagingBasket, Tariff};
use crate::app::services::tariff_repository::TariffRepository;
use crate::config::QueryConfig;
use crate::constants::ALL_STAGING_BASKETS;

/// Read access to imported tariffs
pub struct TariffQueryService {
    repository: Arc<dyn TariffRepository>,
    default_page_size: usize,
    max_page_size: usize,
}

impl TariffQueryService {
    pub fn new(repository: Arc<dyn TariffRepository>, config: &QueryConfig) -> Self {
        Self {
            repository,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    /// Build a page request, using the default size when none is given
    ///
    /// Sizes above the configured maximum are clamped; a size of 0 is rejected.
    pub fn page_request(&self, page: usize, size: Option<usize>) -> Result<PageRequest> {
        let size = size.unwrap_or(self.default_page_size);
        if size > self.max_page_size {
            debug!("Clamping page size {} to {}", size, self.max_page_size);
        }
        PageRequest::new(page, size.min(self.max_page_size))
    }

    /// Tariffs of a country, optionally restricted to one staging basket
    ///
    /// A `staging_basket_id` of `-1` selects every basket.
    pub async fn tariffs(
        &self,
        country_code: &str,
        staging_basket_id: i64,
        page: PageRequest,
    ) -> Result<Page<Tariff>> {
        let page = PageRequest::new(page.page, page.size.min(self.max_page_size))?;

        if staging_basket_id == ALL_STAGING_BASKETS {
            self.repository.find_by_country_code(country_code, page).await
        } else {
            self.repository
                .find_by_country_code_and_staging_basket_id(country_code, staging_basket_id, page)
                .await
        }
    }

    pub async fn staging_baskets(&self, country_code: &str) -> Result<Vec<StagingBasket>> {
        self.repository
            .find_all_staging_baskets_by_country(country_code)
            .await
    }
}
