//! Image selection and thumbnail caching

pub mod image_resolver;
pub mod thumbnail_cache;

pub use image_resolver::resolve_image;
pub use thumbnail_cache::{MemoryThumbnailStore, SqliteThumbnailStore, ThumbnailCache, ThumbnailStore};
