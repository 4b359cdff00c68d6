//! vellum-common: shared media types for the vellum editor core.
//!
//! This crate provides:
//! - `ImageDescriptor` - metadata record identifying a stored file
//! - `FileBlob` / `EditedImage` - locally-selected and crop-edited image data
//! - `BlobNormalizer` - seam for pre-upload format conversion
//! - Link classification and video URL detection for the insert-link and
//!   insert-video affordances

pub mod link;
pub mod media;
pub mod normalize;
pub mod video;

pub use link::{LinkType, classify_link, validate_link};
pub use media::{EditedImage, FileBlob, ImageDescriptor};
pub use normalize::{BlobNormalizer, NormalizeError, needs_conversion};
pub use video::{VideoEmbed, VideoProvider, detect_video, format_video_url};
pub use smol_str::SmolStr;
