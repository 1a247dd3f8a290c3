//! Fetch-backed data provider.
//!
//! The catalog is downloaded once per page load and searched locally; the
//! daily challenge list is fetched on every refresh.
use async_trait::async_trait;
use footle_game::{Catalog, DailyChallenge, Footballer, FootballerId, FootballerProvider};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

use crate::paths::{CATALOG_FILE, DAILY_FILE, data_url_with_base};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network access requires a browser")]
    NotInBrowser,
}

pub struct HttpProvider {
    base: String,
    search_limit: usize,
    catalog: RefCell<Option<Rc<Catalog>>>,
}

impl HttpProvider {
    #[must_use]
    pub fn new(base: &str, search_limit: usize) -> Self {
        Self {
            base: base.to_string(),
            search_limit,
            catalog: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn url(&self, file: &str) -> String {
        data_url_with_base(file, &self.base)
    }

    /// Catalog, fetched on first use and kept for the page's lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be downloaded or parsed. A
    /// failed download is retried on the next call.
    #[allow(clippy::future_not_send)]
    pub async fn catalog(&self) -> Result<Rc<Catalog>, ProviderError> {
        if let Some(cached) = self.catalog.borrow().as_ref() {
            return Ok(Rc::clone(cached));
        }
        let list: Vec<Footballer> = fetch_json(&self.url(CATALOG_FILE)).await?;
        let catalog = Rc::new(Catalog::new(list));
        log::info!("catalog loaded with {} footballers", catalog.len());
        *self.catalog.borrow_mut() = Some(Rc::clone(&catalog));
        Ok(catalog)
    }
}

#[async_trait(?Send)]
impl FootballerProvider for HttpProvider {
    type Error = ProviderError;

    async fn daily_challenges(&self) -> Result<Vec<DailyChallenge>, Self::Error> {
        fetch_json(&self.url(DAILY_FILE)).await
    }

    async fn footballer_by_id(&self, id: FootballerId) -> Result<Option<Footballer>, Self::Error> {
        Ok(self.catalog().await?.get(id).cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<Footballer>, Self::Error> {
        let catalog = self.catalog().await?;
        Ok(catalog
            .search(query, self.search_limit)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(target_arch = "wasm32")]
#[allow(clippy::future_not_send)]
async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, ProviderError> {
    use crate::dom;

    let network = |err: &wasm_bindgen::JsValue| ProviderError::Network {
        url: url.to_string(),
        message: dom::js_error_message(err),
    };
    let response = dom::fetch_response(url).await.map_err(|err| network(&err))?;
    if !response.ok() {
        return Err(ProviderError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let text = dom::response_text(&response)
        .await
        .map_err(|err| network(&err))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(clippy::unused_async)]
async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, ProviderError> {
    log::debug!("skipping fetch of {url} outside the browser");
    Err(ProviderError::NotInBrowser)
}
