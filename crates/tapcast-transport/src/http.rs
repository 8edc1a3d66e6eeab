//! HTTP emitter against the remote input server.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tapcast_types::{Point, ScreenSize};
use tracing::debug;
use url::Url;

use crate::error::EmitterError;
use crate::{IntentEmitter, TypeKeyAck};

/// Default per-request timeout. The relay is fire-and-forget, so a slow
/// server only delays its own calls, never gesture recognition.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Emitter speaking the remote host's HTTP surface.
///
/// Movement carries a JSON body; the stateless operations are plain GETs.
pub struct HttpEmitter {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpEmitter {
    /// Create an emitter for the given base URL, e.g.
    /// `http://192.168.0.123:3000`.
    pub fn new(base_url: &str) -> Result<Self, EmitterError> {
        // A trailing slash keeps Url::join from eating the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, EmitterError> {
        Ok(self.base_url.join(path)?)
    }

    fn check(
        response: reqwest::Response,
        endpoint: &str,
    ) -> Result<reqwest::Response, EmitterError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(EmitterError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            })
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, EmitterError> {
        debug!(path, "emitter GET");
        let response = self.client.get(self.endpoint(path)?).send().await?;
        Self::check(response, path)
    }

    async fn post_delta(&self, path: &str, dx: i32, dy: i32) -> Result<(), EmitterError> {
        debug!(path, dx, dy, "emitter POST");
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(&json!({ "dx": dx, "dy": dy }))
            .send()
            .await?;
        Self::check(response, path)?;
        Ok(())
    }
}

#[async_trait]
impl IntentEmitter for HttpEmitter {
    async fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), EmitterError> {
        self.post_delta("move-mouse", dx, dy).await
    }

    async fn scroll(&self, dx: i32, dy: i32) -> Result<(), EmitterError> {
        self.post_delta("scroll-mouse", dx, dy).await
    }

    async fn click(&self) -> Result<(), EmitterError> {
        self.get("click-mouse").await.map(|_| ())
    }

    async fn right_click(&self) -> Result<(), EmitterError> {
        self.get("right-click-mouse").await.map(|_| ())
    }

    async fn button_down(&self) -> Result<(), EmitterError> {
        self.get("mouse-down").await.map(|_| ())
    }

    async fn button_up(&self) -> Result<(), EmitterError> {
        self.get("mouse-up").await.map(|_| ())
    }

    async fn type_key(&self, symbol: &str) -> Result<TypeKeyAck, EmitterError> {
        debug!(symbol, "emitter type-key");
        let mut url = self.endpoint("type-key")?;
        url.query_pairs_mut().append_pair("key", symbol);
        let response = self.client.get(url).send().await?;
        let response = Self::check(response, "type-key")?;
        Ok(response.json().await?)
    }

    async fn pointer_position(&self) -> Result<Point, EmitterError> {
        Ok(self.get("get-mouse-position").await?.json().await?)
    }

    async fn screen_size(&self) -> Result<ScreenSize, EmitterError> {
        Ok(self.get("get-screen-size").await?.json().await?)
    }
}
