//! Image Resolution Chain
//!
//! Picks one display image from independently unreliable sources.
//!
//! Priority: wiki → youtube thumbnail → provider image → user upload.
//! A layer is absent when its source failed or returned nothing; blank
//! strings count as absent. No retries, no network access.

use crate::types::{ImageLayers, ImageSource, ResolvedImage};
use tracing::debug;

/// First present layer in priority order, or `None` when all are absent
pub fn resolve_image(layers: &ImageLayers) -> Option<ResolvedImage> {
    let chain = [
        (ImageSource::Wiki, &layers.wiki),
        (ImageSource::Youtube, &layers.youtube),
        (ImageSource::ApiProvided, &layers.api_provided),
        (ImageSource::UserUpload, &layers.user_upload),
    ];

    let resolved = chain.into_iter().find_map(|(source, layer)| {
        layer
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| ResolvedImage {
                source,
                url: url.to_string(),
            })
    });

    match &resolved {
        Some(image) => debug!(source = ?image.source, url = %image.url, "Image resolved"),
        None => debug!("No image layer available"),
    }

    resolved
}
