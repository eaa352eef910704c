use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::errors::ApiError;
use crate::domain::ports::ObjectStorage;

/// Object metadata returned by the Firebase Storage upload endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    error: StorageErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StorageErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Uploads through the Firebase Storage REST API and hands back the public
/// download URL of the stored object.
#[derive(Clone)]
pub struct FirebaseStorage {
    client: Client,
    base_url: String,
    bucket: String,
}

impl FirebaseStorage {
    pub fn new(client: Client, base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    fn objects_url(&self) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Malformed(format!("storage base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Malformed("storage base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(["b", self.bucket.as_str(), "o"]);
        Ok(url)
    }

    /// `.../b/{bucket}/o/{object path, '/' encoded}?alt=media&token=...`
    pub fn download_url(&self, object: &str, token: Option<&str>) -> Result<String, ApiError> {
        let mut url = self.objects_url()?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Malformed("storage base URL cannot hold a path".to_string()))?
            .push(object);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(token) = token {
                query.append_pair("token", token);
            }
        }
        Ok(url.to_string())
    }
}

#[async_trait]
impl ObjectStorage for FirebaseStorage {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let object = format!("{}/{}-{}", folder, Uuid::new_v4(), file_name);
        let mut url = self.objects_url()?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", &object);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StorageErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let meta: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        // Several tokens may be issued; any of them grants read access.
        let token = meta
            .download_tokens
            .as_deref()
            .and_then(|t| t.split(',').next())
            .filter(|t| !t.is_empty());
        self.download_url(&meta.name, token)
    }
}
