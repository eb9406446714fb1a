//! Provider implementation for the DSNY monthly tonnage dataset on NYC Open Data.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use tonnage_core::{
    model::{QueryFilter, RawRow},
    ports::{QueryError, TonnageQueryPort},
};

/// Host serving the NYC Open Data portal.
pub const DEFAULT_DOMAIN: &str = "data.cityofnewyork.us";
/// Dataset identifier of "DSNY Monthly Tonnage Data".
pub const DEFAULT_DATASET: &str = "8bkb-pvci";

const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Remote tonnage query against a Socrata SODA endpoint.
pub struct SocrataTonnagePort {
    client: Client,
    resource_url: String,
    app_token: Option<String>,
}

impl SocrataTonnagePort {
    /// Create a new port for `dataset` on `domain`, bound to the given HTTP client.
    ///
    /// `domain` may carry a scheme; a bare host is queried over https.
    #[must_use]
    pub fn new(client: Client, domain: &str, dataset: &str, app_token: Option<String>) -> Self {
        let base = if domain.contains("://") {
            domain.trim_end_matches('/').to_owned()
        } else {
            format!("https://{}", domain.trim_end_matches('/'))
        };

        Self {
            client,
            resource_url: format!("{base}/resource/{dataset}.json"),
            app_token,
        }
    }

    /// Build the filtered request without sending it.
    fn request(&self, filter: &QueryFilter) -> RequestBuilder {
        let select = QueryFilter::select_clause();
        let month = filter.month.filter_value();

        let mut req = self.client.get(&self.resource_url).query(&[
            ("$select", select.as_str()),
            ("month", month.as_str()),
            ("borough", filter.borough.name()),
            ("communitydistrict", filter.district.as_str()),
        ]);

        if let Some(token) = &self.app_token {
            req = req.header(APP_TOKEN_HEADER, token);
        }

        req
    }
}

#[async_trait]
impl TonnageQueryPort for SocrataTonnagePort {
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<RawRow>, QueryError> {
        debug!(
            "querying {} for {} district {}",
            self.resource_url, filter.borough, filter.district
        );
        let rows = fetch_json::<Vec<RawRow>>(self.request(filter)).await?;
        debug!("received {} rows", rows.len());
        Ok(rows)
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, QueryError> {
    req.send()
        .await
        .map_err(network)?
        .error_for_status()
        .map_err(network)?
        .json()
        .await
        .map_err(network)
}

fn network(error: reqwest::Error) -> QueryError {
    QueryError::Network(Box::new(error))
}
