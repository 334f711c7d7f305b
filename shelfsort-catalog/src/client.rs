use serde::de::DeserializeOwned;

use shelfsort_core::{CancelToken, Price};

use crate::credentials::Credentials;
use crate::error::CatalogError;
use crate::http::{HttpRequest, ReqwestBackend};
use crate::transport::{Transport, TransportStats};
use crate::types::{CollectionPage, Identity, ReleasePrice};

/// Production API root.
pub const API_BASE: &str = "https://api.discogs.com";

/// Typed access to the handful of endpoints the pipeline needs.
pub struct CatalogClient {
    transport: Transport,
}

impl CatalogClient {
    /// Client against the live API using the given credentials.
    pub fn connect(creds: &Credentials) -> Result<Self, CatalogError> {
        let backend = ReqwestBackend::new(creds, API_BASE)?;
        Ok(Self::from_transport(Transport::new(backend)))
    }

    pub fn from_transport(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn set_cancel(&mut self, cancel: CancelToken) {
        self.transport.set_cancel(cancel);
    }

    pub fn stats(&self) -> &TransportStats {
        self.transport.stats()
    }

    pub fn remaining_budget(&self) -> Option<u32> {
        self.transport.remaining_budget()
    }

    /// Username the token belongs to.
    pub fn identity(&mut self) -> Result<Identity, CatalogError> {
        self.get_json(HttpRequest::get("/oauth/identity"))
    }

    /// One page of a collection folder, sorted by artist ascending.
    pub fn collection_page(
        &mut self,
        username: &str,
        folder_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<CollectionPage, CatalogError> {
        let path = format!(
            "/users/{}/collection/folders/{}/releases",
            urlencoding::encode(username),
            folder_id
        );
        let request = HttpRequest::get(path)
            .param("page", page)
            .param("per_page", per_page)
            .param("sort", "artist")
            .param("sort_order", "asc");
        self.get_json(request)
    }

    /// Lowest marketplace price for a release in `currency`.
    ///
    /// `None` when nothing is for sale or the release is blocked from sale.
    pub fn release_price(
        &mut self,
        release_id: u64,
        currency: &str,
    ) -> Result<Option<Price>, CatalogError> {
        let request =
            HttpRequest::get(format!("/releases/{release_id}")).param("curr_abbr", currency);
        let body: ReleasePrice = self.get_json(request)?;
        if body.blocked_from_sale || body.num_for_sale == Some(0) {
            return Ok(None);
        }
        Ok(body
            .lowest_price
            .and_then(|amount| Price::from_major(amount, currency)))
    }

    fn get_json<T: DeserializeOwned>(&mut self, request: HttpRequest) -> Result<T, CatalogError> {
        let resp = self.transport.send(&request)?;
        serde_json::from_str(&resp.body)
            .map_err(|e| CatalogError::decode(request.path.clone(), e.to_string()))
    }
}
