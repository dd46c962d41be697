//! Decoding of uploaded images.
//!
//! Uploads are sniffed and fully decoded so that unreadable files are rejected
//! before any provider call, then re-encoded as PNG for the provider.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to re-encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// An upload that decoded successfully, normalized to PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub source_format: ImageFormat,
    pub width: u32,
    pub height: u32,
    png: Vec<u8>,
}

impl DecodedImage {
    pub fn mime_type(&self) -> &'static str {
        ImageFormat::Png.to_mime_type()
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ImageDecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| ImageDecodeError::UnknownFormat)?;

    let source_format = reader.format().ok_or(ImageDecodeError::UnknownFormat)?;
    let image = reader.decode().map_err(ImageDecodeError::Decode)?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(ImageDecodeError::Encode)?;

    tracing::debug!(
        format = ?source_format,
        width = image.width(),
        height = image.height(),
        "Decoded uploaded image"
    );

    Ok(DecodedImage {
        source_format,
        width: image.width(),
        height: image.height(),
        png: png.into_inner(),
    })
}
