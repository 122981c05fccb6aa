// HTTP transport for rfiscan
// One reqwest client (one connection pool) is shared across every trial of
// a scan

use std::time::Duration;

use reqwest::{redirect, Client};
use url::Url;

use crate::error::Error;
use crate::models::Method;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The only capability the probe needs from an HTTP collaborator: issue one
/// request, hand back the raw body. Non-2xx responses still return their
/// body; status codes are never interpreted here.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn fetch(&self, method: Method, url: &Url) -> Result<String, Error>;
}

pub struct HttpEngine {
    client: Client,
}

impl HttpEngine {
    pub fn new(timeout_secs: u64) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(redirect::Policy::limited(10))
            .build()
            .map_err(Error::Client)?;
        Ok(Self { client })
    }
}

impl Transport for HttpEngine {
    async fn fetch(&self, method: Method, url: &Url) -> Result<String, Error> {
        let response = self
            .client
            .request(method.as_reqwest(), url.clone())
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;

        response.text().await.map_err(|e| Error::transport(url, e))
    }
}
