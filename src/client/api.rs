use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::plants::{DeleteResponse, InsertResponse, Plant, PlantFields, UpdateResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Status { message, .. } => message,
            ClientError::Transport(_) => "Could not reach the server",
            ClientError::Decode(_) => "Unexpected response from the server",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

/// Remote plant endpoints as seen by a client.
#[async_trait]
pub trait PlantApi: Send + Sync {
    async fn list_plants(&self) -> Result<Vec<Plant>, ClientError>;
    async fn list_owned(&self, user_id: &str) -> Result<Vec<Plant>, ClientError>;
    async fn get_plant(&self, id: Uuid) -> Result<Plant, ClientError>;
    async fn create_plant(&self, fields: &PlantFields) -> Result<InsertResponse, ClientError>;
    async fn update_plant(
        &self,
        id: Uuid,
        fields: &PlantFields,
    ) -> Result<UpdateResponse, ClientError>;
    async fn delete_plant(&self, id: Uuid) -> Result<DeleteResponse, ClientError>;
}

/// `base` with `segments` appended to its path and an optional query pair.
fn endpoint(
    base: &Url,
    segments: &[&str],
    query: Option<(&str, &str)>,
) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::Transport(format!("base url cannot hold a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    if let Some((key, value)) = query {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url)
}

/// Turns a response into `T`, or into `ClientError::Status` carrying the
/// server's `{"error": ..}` message.
fn decode_body<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ClientError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(bytes)
            .ok()
            .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());
        warn!(%status, %message, "api request failed");
        return Err(ClientError::Status { status, message });
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Plant API client over HTTP.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::Transport(format!("invalid base url: {e}")))?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base,
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        endpoint(&self.base, segments, None)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let response = req.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");
        let bytes = response.bytes().await?;
        decode_body(status, &bytes)
    }
}

#[async_trait]
impl PlantApi for HttpApi {
    async fn list_plants(&self) -> Result<Vec<Plant>, ClientError> {
        self.send(self.client.get(self.url(&["plants"])?)).await
    }

    async fn list_owned(&self, user_id: &str) -> Result<Vec<Plant>, ClientError> {
        let url = endpoint(&self.base, &["my-plants"], Some(("userId", user_id)))?;
        self.send(self.client.get(url)).await
    }

    async fn get_plant(&self, id: Uuid) -> Result<Plant, ClientError> {
        let id = id.to_string();
        self.send(self.client.get(self.url(&["plants", &id])?)).await
    }

    async fn create_plant(&self, fields: &PlantFields) -> Result<InsertResponse, ClientError> {
        self.send(self.client.post(self.url(&["plants"])?).json(fields))
            .await
    }

    async fn update_plant(
        &self,
        id: Uuid,
        fields: &PlantFields,
    ) -> Result<UpdateResponse, ClientError> {
        let id = id.to_string();
        self.send(self.client.put(self.url(&["plants", &id])?).json(fields))
            .await
    }

    async fn delete_plant(&self, id: Uuid) -> Result<DeleteResponse, ClientError> {
        let id = id.to_string();
        self.send(self.client.delete(self.url(&["plants", &id])?))
            .await
    }
}

/// In-process client that hands requests straight to a router.
#[cfg(test)]
#[derive(Clone)]
pub struct RouterApi {
    router: axum::Router,
    base: Url,
}

#[cfg(test)]
impl RouterApi {
    pub fn new(router: axum::Router) -> Self {
        Self {
            router,
            base: Url::parse("http://localhost/").expect("static url"),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: axum::http::Method,
        segments: &[&str],
        query: Option<(&str, &str)>,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError> {
        use axum::{
            body::{to_bytes, Body},
            http::{header, Request},
        };
        use tower::ServiceExt;

        let url = endpoint(&self.base, segments, query)?;
        let uri = match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_string(),
        };
        let req = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(bytes) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes)),
            None => req.body(Body::empty()),
        }
        .map_err(|e| ClientError::Transport(e.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .unwrap_or_else(|never| match never {});
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        decode_body(status, &bytes)
    }
}

#[cfg(test)]
#[async_trait]
impl PlantApi for RouterApi {
    async fn list_plants(&self) -> Result<Vec<Plant>, ClientError> {
        self.send(axum::http::Method::GET, &["plants"], None, None)
            .await
    }

    async fn list_owned(&self, user_id: &str) -> Result<Vec<Plant>, ClientError> {
        self.send(
            axum::http::Method::GET,
            &["my-plants"],
            Some(("userId", user_id)),
            None,
        )
        .await
    }

    async fn get_plant(&self, id: Uuid) -> Result<Plant, ClientError> {
        let id = id.to_string();
        self.send(axum::http::Method::GET, &["plants", &id], None, None)
            .await
    }

    async fn create_plant(&self, fields: &PlantFields) -> Result<InsertResponse, ClientError> {
        let body = serde_json::to_vec(fields)?;
        self.send(axum::http::Method::POST, &["plants"], None, Some(body))
            .await
    }

    async fn update_plant(
        &self,
        id: Uuid,
        fields: &PlantFields,
    ) -> Result<UpdateResponse, ClientError> {
        let id = id.to_string();
        let body = serde_json::to_vec(fields)?;
        self.send(axum::http::Method::PUT, &["plants", &id], None, Some(body))
            .await
    }

    async fn delete_plant(&self, id: Uuid) -> Result<DeleteResponse, ClientError> {
        let id = id.to_string();
        self.send(axum::http::Method::DELETE, &["plants", &id], None, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, state::AppState};

    async fn spawn_server() -> HttpApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_app(AppState::fake());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        HttpApi::new(&format!("http://{addr}")).unwrap()
    }

    #[test]
    fn endpoint_joins_segments_and_encodes_query() {
        let base = Url::parse("http://plants.example.com/api/").unwrap();
        let url = endpoint(&base, &["my-plants"], Some(("userId", "a b&c=d"))).unwrap();
        assert_eq!(
            url.as_str(),
            "http://plants.example.com/api/my-plants?userId=a+b%26c%3Dd"
        );

        let bare = Url::parse("http://localhost:8080").unwrap();
        let id = Uuid::nil().to_string();
        assert_eq!(
            endpoint(&bare, &["plants", &id], None).unwrap().path(),
            format!("/plants/{id}")
        );
    }

    #[test]
    fn invalid_base_url_is_a_transport_error() {
        assert!(matches!(
            HttpApi::new("not a url"),
            Err(ClientError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn crud_over_http() {
        let api = spawn_server().await;
        let fields = PlantFields {
            name: Some("Ficus".into()),
            user_id: Some("uid 1".into()),
            ..Default::default()
        };
        let created = api.create_plant(&fields).await.unwrap();
        assert!(created.acknowledged);

        let plant = api.get_plant(created.inserted_id).await.unwrap();
        assert_eq!(plant.name.as_deref(), Some("Ficus"));

        let owned = api.list_owned("uid 1").await.unwrap();
        assert_eq!(owned.len(), 1);
        assert!(api.list_owned("uid").await.unwrap().is_empty());

        let patch = PlantFields {
            health_status: Some("thriving".into()),
            ..Default::default()
        };
        let updated = api.update_plant(plant.id, &patch).await.unwrap();
        assert_eq!(updated.modified_count, 1);

        let deleted = api.delete_plant(plant.id).await.unwrap();
        assert_eq!(deleted.deleted_count, 1);
        assert!(api.list_plants().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_error_body_message_is_surfaced() {
        let api = spawn_server().await;
        let err = api.get_plant(Uuid::new_v4()).await.unwrap_err();
        match &err {
            ClientError::Status { status, message } => {
                assert_eq!(*status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Plant not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "Plant not found");
    }

    #[tokio::test]
    async fn bearer_token_is_sent_with_writes() {
        let api = spawn_server().await.with_token("garbage");
        let err = api.create_plant(&PlantFields::default()).await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Invalid or expired token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = HttpApi::new(&format!("http://{addr}")).unwrap();
        let err = api.list_plants().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.user_message(), "Could not reach the server");
    }

    #[tokio::test]
    async fn router_client_matches_the_http_contract() {
        let api = RouterApi::new(build_app(AppState::fake()));
        let fields = PlantFields {
            name: Some("Aloe".into()),
            user_id: Some("uid 1".into()),
            ..Default::default()
        };
        api.create_plant(&fields).await.unwrap();
        assert_eq!(api.list_owned("uid 1").await.unwrap().len(), 1);
        let err = api.get_plant(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.user_message(), "Plant not found");
    }
}
