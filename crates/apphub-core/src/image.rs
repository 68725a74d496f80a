//! Logo probing.
//!
//! Only the header is inspected: the format from its magic bytes and, for PNG,
//! the dimensions from the `IHDR` chunk that must follow the signature.

/// Image container formats recognised by [`PngProber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

/// Format and pixel size of an image. Size is only known for PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Inspect image bytes.
pub trait ImageProber: Send + Sync {
    /// Return `None` when the bytes are not a recognisable image.
    fn probe(&self, bytes: &[u8]) -> Option<ImageInfo>;
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Header-only prober.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngProber;

impl ImageProber for PngProber {
    fn probe(&self, bytes: &[u8]) -> Option<ImageInfo> {
        if bytes.starts_with(&PNG_SIGNATURE) {
            return png_dimensions(bytes).map(|(width, height)| ImageInfo {
                format: ImageFormat::Png,
                width,
                height,
            });
        }

        let format = if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            ImageFormat::Jpeg
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            ImageFormat::Gif
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            ImageFormat::Webp
        } else {
            return None;
        };

        Some(ImageInfo {
            format,
            width: 0,
            height: 0,
        })
    }
}

// Layout: signature(8) | length(4) | "IHDR"(4) | width(4, BE) | height(4, BE)
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let header = bytes.get(8..24)?;
    if &header[4..8] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(header[8..12].try_into().ok()?);
    let height = u32::from_be_bytes(header[12..16].try_into().ok()?);
    Some((width, height))
}

/// Minimal PNG header with the given dimensions. Enough for [`PngProber`].
#[cfg(test)]
pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    out.extend_from_slice(&13u32.to_be_bytes());
    out.extend_from_slice(b"IHDR");
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    // bit depth, colour type, compression, filter, interlace, crc
    out.extend_from_slice(&[8, 6, 0, 0, 0, 0, 0, 0, 0]);
    out
}
