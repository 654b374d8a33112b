// error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Failures on the way from an image path to a panorama on screen.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("could not open panorama {path:?}: {source}")]
    OpenImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode panorama {path:?}: {source}")]
    DecodeImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no panorama image was provided")]
    NoImage,
}
