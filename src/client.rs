//! API client facade
//!
//! [`Client`] ties the transport, decoders and pagination engine together
//! behind a small typed API: `get` for single entities, `get_all` and
//! friends for paginated collections, `post`/`patch`/`delete` for writes.

use crate::auth::{StaticToken, TokenSource};
use crate::config::ClientConfig;
use crate::decode::{decode_api_error, decode_single};
use crate::error::Result;
use crate::http::{Request, Response, Transport};
use crate::pagination::{CancelSignal, Paginator};
use crate::types::Method;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Typed client for a paginated, token-authenticated JSON API
///
/// Cloning is cheap: clones share the connection pool, token source and
/// rate limiter.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
    config: ClientConfig,
}

impl Client {
    /// Create a client with the default configuration
    pub fn new(token_source: impl TokenSource + 'static) -> Result<Self> {
        Self::with_config(ClientConfig::default(), token_source)
    }

    /// Create a client from a configuration and a token source
    pub fn with_config(
        config: ClientConfig,
        token_source: impl TokenSource + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let transport = Transport::new(&config, Arc::new(token_source))?;

        info!(host = %config.host, version = %config.version, "Created API client");
        Ok(Self { transport, config })
    }

    /// Create a client with the default configuration and a fixed bearer token
    pub fn from_token(token: impl Into<String>) -> Result<Self> {
        Self::new(StaticToken::new(token))
    }

    /// Change the API version used by relative paths in later requests
    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        self.transport.set_version(version.clone());
        self.config.version = version;
    }

    /// Current API version
    pub fn version(&self) -> &str {
        self.transport.version()
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Pagination engine configured with this client's envelope and limits
    pub fn paginator(&self) -> Paginator<'_> {
        Paginator::new(&self.transport, &self.config.envelope).with_limits(self.config.limits)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Fetch a single entity
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.transport.send(Request::get(path)).await?;
        let response = check_status(response)?;
        decode_single(&response.url, &response.body)
    }

    /// Call `on_element` for every element of a paginated collection, in
    /// server order
    ///
    /// Elements already delivered stay delivered when a later page fails.
    pub async fn get_all<T, F>(&self, path: &str, on_element: F) -> Result<()>
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        self.paginator().for_each(path, on_element).await
    }

    /// Like [`Client::get_all`], but an `Err` from the callback stops the
    /// walk before the next page is requested
    pub async fn try_get_all<T, F>(&self, path: &str, on_element: F) -> Result<()>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> Result<()>,
    {
        self.paginator().try_for_each(path, on_element).await
    }

    /// Like [`Client::get_all`], aborting with [`crate::Error::Cancelled`]
    /// once `cancel` fires
    pub async fn get_all_with<T, F>(
        &self,
        path: &str,
        cancel: &CancelSignal,
        on_element: F,
    ) -> Result<()>
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        self.paginator()
            .with_cancel(cancel)
            .for_each(path, on_element)
            .await
    }

    /// Collect every element of a paginated collection
    pub async fn collect_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        self.paginator().collect(path).await
    }

    /// Stream every element of a paginated collection
    ///
    /// Pages are fetched lazily as the stream is polled.
    pub fn stream_all<'a, T>(&'a self, path: &str) -> impl Stream<Item = Result<T>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        self.paginator().items(path)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Send a request with an optional JSON body and decode the reply
    ///
    /// Returns `Ok(None)` when the server answers without content (e.g. 204).
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = Request::new(method, path);
        if let Some(body) = body {
            request = request.json(body)?;
        }

        let response = check_status(self.transport.send(request).await?)?;
        if response.is_empty() {
            return Ok(None);
        }
        decode_single(&response.url, &response.body).map(Some)
    }

    /// Create an entity
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, Some(body)).await
    }

    /// Update an entity
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, Some(body)).await
    }

    /// Delete an entity
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send_json::<(), serde_json::Value>(Method::DELETE, path, None)
            .await
            .map(drop)
    }
}

fn check_status(response: Response) -> Result<Response> {
    if response.is_error() {
        return Err(decode_api_error(&response.url, response.status, &response.body).into());
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: String,
        #[serde(rename = "displayName")]
        display_name: String,
    }

    fn client_for(server: &MockServer) -> Client {
        let config = ClientConfig::builder().host(server.uri()).build();
        Client::with_config(config, StaticToken::new("t")).unwrap()
    }

    #[test]
    fn test_client_defaults() {
        let client = Client::from_token("t").unwrap();
        assert_eq!(client.version(), "1.0");
        assert_eq!(client.config().host, "https://graph.microsoft.com");
        assert_eq!(client.transport().host(), "https://graph.microsoft.com");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::builder().host("not a url").build();
        let err = Client::with_config(config, StaticToken::new("t")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_set_version_updates_config() {
        let mut client = Client::from_token("t").unwrap();
        client.set_version("beta");
        assert_eq!(client.version(), "beta");
        assert_eq!(client.config().version, "beta");
    }

    #[tokio::test]
    async fn test_post_returns_created_entity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1.0/users"))
            .and(body_json(json!({"displayName": "Ada"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"id": "42", "displayName": "Ada"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created: Option<User> = client
            .post("users", &json!({"displayName": "Ada"}))
            .await
            .unwrap();

        assert_eq!(
            created,
            Some(User {
                id: "42".to_string(),
                display_name: "Ada".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_patch_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1.0/users/42"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let updated: Option<User> = client
            .patch("users/42", &json!({"displayName": "Grace"}))
            .await
            .unwrap();

        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1.0/users/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "Request_ResourceNotFound", "message": "not found"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.delete("users/missing").await.unwrap_err();

        let api = err.api_error().unwrap();
        assert_eq!(api.status, 404);
        assert_eq!(api.code, "Request_ResourceNotFound");
    }

    #[tokio::test]
    async fn test_delete_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1.0/users/42"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete("users/42").await.unwrap();
    }
}
