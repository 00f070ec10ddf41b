//! Encoded bitmap snapshots.
//!
//! A snapshot is a PNG (RGBA, 8 bits per channel) held in memory. History keeps
//! these rather than raw pixels; persistence stores them as a base64 data URL.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Raw RGBA pixels, row-major, 4 bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl DecodedImage {
    /// RGBA of the pixel at (x, y). Panics if out of range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

/// An immutable encoded snapshot. Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    png: Arc<[u8]>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    /// Encode raw RGBA pixels.
    pub fn encode(width: u32, height: u32, rgba: &[u8]) -> Result<Self, CodecError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(CodecError::SizeMismatch {
                width,
                height,
                len: rgba.len(),
            });
        }

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(rgba)?;
            writer.finish()?;
        }

        trace!(width, height, png_bytes = buf.len(), "encoded snapshot");
        Ok(Self {
            width,
            height,
            png: buf.into(),
        })
    }

    /// Wrap PNG bytes that came from elsewhere (storage). Only the header is
    /// read here; pixel data is validated on decode.
    pub fn from_png(bytes: Vec<u8>) -> Result<Self, CodecError> {
        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info()?;
        let info = reader.info();
        let (width, height) = (info.width, info.height);
        drop(reader);

        Ok(Self {
            width,
            height,
            png: bytes.into(),
        })
    }

    /// Decode back to RGBA pixels.
    pub fn decode(&self) -> Result<DecodedImage, CodecError> {
        let mut decoder = png::Decoder::new(&self.png[..]);
        decoder.set_transformations(png::Transformations::EXPAND);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        if info.bit_depth != png::BitDepth::Eight {
            return Err(CodecError::UnsupportedLayout {
                detail: format!("{:?} bit depth", info.bit_depth),
            });
        }

        let rgba = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
                .collect(),
            png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, u8::MAX]).collect(),
            png::ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            other => {
                return Err(CodecError::UnsupportedLayout {
                    detail: format!("{other:?} color type"),
                })
            }
        };

        Ok(DecodedImage {
            width: info.width,
            height: info.height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...`
    pub fn to_data_url(&self) -> String {
        let mut url = String::with_capacity(DATA_URL_PREFIX.len() + self.png.len() * 4 / 3 + 4);
        url.push_str(DATA_URL_PREFIX);
        STANDARD.encode_string(&self.png[..], &mut url);
        url
    }

    pub fn from_data_url(url: &str) -> Result<Self, CodecError> {
        let payload = url
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(CodecError::NotPngDataUrl)?;
        let bytes = STANDARD.decode(payload.trim())?;
        Self::from_png(bytes)
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    SizeMismatch { width: u32, height: u32, len: usize },

    #[error("png encode failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("png decode failed: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("unsupported png layout: {detail}")]
    UnsupportedLayout { detail: String },

    #[error("not a base64 png data url")]
    NotPngDataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| {
                if i % 2 == 0 {
                    [255, 255, 255, 255]
                } else {
                    [0x11, 0x22, 0x33, 255]
                }
            })
            .collect()
    }

    #[test]
    fn encode_decode_preserves_pixels() {
        let rgba = checker(7, 5);
        let snap = Snapshot::encode(7, 5, &rgba).unwrap();
        let image = snap.decode().unwrap();

        assert_eq!((image.width, image.height), (7, 5));
        assert_eq!(image.rgba, rgba);
        assert_eq!(image.pixel(1, 0), [0x11, 0x22, 0x33, 255]);
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        let err = Snapshot::encode(4, 4, &[0u8; 10]).unwrap_err();
        assert!(matches!(err, CodecError::SizeMismatch { len: 10, .. }));
    }

    #[test]
    fn data_url_roundtrip() {
        let snap = Snapshot::encode(3, 2, &checker(3, 2)).unwrap();
        let url = snap.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let back = Snapshot::from_data_url(&url).unwrap();
        assert_eq!(back, snap);
        assert_eq!((back.width(), back.height()), (3, 2));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            Snapshot::from_data_url("data:text/plain,hello"),
            Err(CodecError::NotPngDataUrl)
        ));
        assert!(matches!(
            Snapshot::from_data_url("data:image/png;base64,!!!"),
            Err(CodecError::Base64(_))
        ));
        assert!(matches!(
            Snapshot::from_png(b"definitely not a png".to_vec()),
            Err(CodecError::Decode(_))
        ));
    }
}
