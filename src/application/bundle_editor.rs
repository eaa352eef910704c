use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::bundle::{Bundle, BundleDraft};
use crate::domain::errors::DomainError;
use crate::domain::ports::{BundleGateway, ObjectStorage};

use super::busy::BusyFlag;

/// Folder an uploaded image lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Merch,
    SizeChart,
}

impl ImageKind {
    pub fn folder(self) -> &'static str {
        match self {
            ImageKind::Merch => "merch-images",
            ImageKind::SizeChart => "size-charts",
        }
    }
}

impl FromStr for ImageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merch" => Ok(ImageKind::Merch),
            "size-chart" => Ok(ImageKind::SizeChart),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown image kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadedImage {
    pub url: String,
}

/// Club coordinator's bundle form: validation, image upload and submission.
pub struct BundleEditor {
    bundles: Arc<dyn BundleGateway>,
    storage: Arc<dyn ObjectStorage>,
    submitting: BusyFlag,
}

impl BundleEditor {
    pub fn new(bundles: Arc<dyn BundleGateway>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            bundles,
            storage,
            submitting: BusyFlag::default(),
        }
    }

    pub async fn list(&self, token: &str) -> Result<Vec<Bundle>, DomainError> {
        self.bundles
            .list_club_bundles(token)
            .await
            .map_err(|e| e.into_domain("Failed to fetch bundles"))
    }

    pub async fn fetch(&self, token: &str, id: &str) -> Result<Bundle, DomainError> {
        self.bundles
            .fetch_club_bundle(token, id)
            .await
            .map_err(|e| e.into_domain("Failed to fetch bundle"))
    }

    pub async fn create(&self, token: &str, draft: BundleDraft) -> Result<Bundle, DomainError> {
        draft.validate()?;
        let _guard = self.submitting.try_begin()?;
        let bundle = self
            .bundles
            .create_bundle(token, &draft)
            .await
            .map_err(|e| e.into_domain("Failed to create bundle"))?;
        log::info!("created bundle {} '{}'", bundle.id, bundle.title);
        Ok(bundle)
    }

    pub async fn edit(
        &self,
        token: &str,
        id: &str,
        draft: BundleDraft,
    ) -> Result<Bundle, DomainError> {
        draft.validate()?;
        let _guard = self.submitting.try_begin()?;
        let bundle = self
            .bundles
            .edit_club_bundle(token, id, &draft)
            .await
            .map_err(|e| e.into_domain("Failed to update bundle"))?;
        log::info!("updated bundle {}", bundle.id);
        Ok(bundle)
    }

    pub async fn upload_image(
        &self,
        kind: ImageKind,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, DomainError> {
        if !content_type.starts_with("image/") {
            return Err(DomainError::InvalidInput(
                "Only image files can be uploaded".to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("The file is empty".to_string()));
        }
        let file_name = sanitize_file_name(file_name);
        let url = self
            .storage
            .upload(kind.folder(), &file_name, content_type, bytes)
            .await
            .map_err(|e| e.into_domain("Failed to upload image"))?;
        log::debug!("uploaded {} to {}", file_name, url);
        Ok(UploadedImage { url })
    }
}

/// Keep letters, digits, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
