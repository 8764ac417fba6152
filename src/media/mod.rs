//! Remote image fetching
//!
//! A single bounded GET: no retries, no batching, no caching. The body is
//! accepted only if its leading bytes identify a known image format.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The URL is malformed, unreachable, timed out, or answered with an error status
    #[error("invalid URL ==>>{url}<<== : {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The response body is not a recognised image
    #[error("{url} did not return an image")]
    NotAnImage { url: String },
}

/// Image formats recognised by their magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
    Ico,
}

impl ImageFormat {
    /// Identify the format from the start of the file
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::WebP)
        } else if bytes.starts_with(b"BM") && bytes.len() >= 26 {
            Some(Self::Bmp)
        } else if bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
            Some(Self::Ico)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
            Self::Ico => "ico",
        }
    }

    /// Width and height from the header, for formats that keep them at a fixed offset
    pub fn dimensions(&self, bytes: &[u8]) -> Option<(u32, u32)> {
        match self {
            // IHDR chunk follows the 8-byte signature and 8-byte chunk header
            Self::Png => Some((be_u32(bytes, 16)?, be_u32(bytes, 20)?)),
            Self::Gif => Some((le_u16(bytes, 6)? as u32, le_u16(bytes, 8)? as u32)),
            // BITMAPINFOHEADER; height is negative for top-down bitmaps
            Self::Bmp => Some((
                le_i32(bytes, 18)?.unsigned_abs(),
                le_i32(bytes, 22)?.unsigned_abs(),
            )),
            Self::Jpeg | Self::WebP | Self::Ico => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloaded image
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub url: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    pub dimensions: Option<(u32, u32)>,
}

/// Download `url` and check that it is an image
pub async fn fetch_image(url: &str, timeout: Duration) -> Result<RemoteImage, MediaError> {
    let invalid = |reason: String| MediaError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| invalid(e.to_string()))?;

    let response = client
        .get(parsed)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| invalid(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| invalid(e.to_string()))?
        .to_vec();

    let format = ImageFormat::sniff(&bytes).ok_or_else(|| MediaError::NotAnImage {
        url: url.to_string(),
    })?;
    let dimensions = format.dimensions(&bytes);

    tracing::debug!("Fetched {} image ({} bytes) from {}", format, bytes.len(), url);

    Ok(RemoteImage {
        url: url.to_string(),
        format,
        bytes,
        dimensions,
    })
}

fn be_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 4)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn le_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let b = bytes.get(at..at + 2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

fn le_i32(bytes: &[u8], at: usize) -> Option<i32> {
    let b = bytes.get(at..at + 4)?;
    Some(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    /// PNG signature plus an IHDR chunk for a 3x2 image
    fn png_header() -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&3u32.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes
    }

    async fn serve() -> SocketAddr {
        let app = Router::new()
            .route("/logo.png", get(|| async { png_header() }))
            .route("/page", get(|| async { "<html>hello</html>" }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route(
                "/slow.png",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    png_header()
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(&png_header()), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a\x0a\x00\x05\x00"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::sniff(b"{\"not\": \"an image\"}"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(ImageFormat::Png.dimensions(&png_header()), Some((3, 2)));
        assert_eq!(
            ImageFormat::Gif.dimensions(b"GIF89a\x0a\x00\x05\x00"),
            Some((10, 5))
        );

        let mut bmp = vec![0u8; 26];
        bmp[..2].copy_from_slice(b"BM");
        bmp[18..22].copy_from_slice(&640i32.to_le_bytes());
        bmp[22..26].copy_from_slice(&(-480i32).to_le_bytes());
        assert_eq!(ImageFormat::Bmp.dimensions(&bmp), Some((640, 480)));

        assert_eq!(ImageFormat::Png.dimensions(b"\x89PNG\r\n\x1a\n"), None);
    }

    #[tokio::test]
    async fn test_fetch_png() {
        let addr = serve().await;
        let url = format!("http://{}/logo.png", addr);

        let image = fetch_image(&url, Duration::from_secs(5)).await.unwrap();

        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.dimensions, Some((3, 2)));
        assert_eq!(image.bytes, png_header());
    }

    #[tokio::test]
    async fn test_fetch_non_image() {
        let addr = serve().await;
        let url = format!("http://{}/page", addr);

        let err = fetch_image(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, MediaError::NotAnImage { .. }));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let addr = serve().await;
        let url = format!("http://{}/broken", addr);

        let err = fetch_image(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, MediaError::InvalidUrl { .. }));
        assert!(err.to_string().contains(&url));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let addr = serve().await;
        let url = format!("http://{}/slow.png", addr);

        let err = fetch_image(&url, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_rejects_bad_urls() {
        for url in ["not a url", "ftp://example.com/a.png"] {
            let err = fetch_image(url, Duration::from_secs(1)).await.unwrap_err();
            assert!(matches!(err, MediaError::InvalidUrl { .. }), "{url}");
        }
    }
}
