//! Fetch a remote image and report what it is

use anyhow::Result;

use crate::media::{fetch_image, RemoteImage};
use crate::Site;

pub async fn run(site: &Site, url: &str) -> Result<()> {
    let image = fetch_image(url, site.config.image_timeout()).await?;
    println!("{}", describe(&image));
    Ok(())
}

fn describe(image: &RemoteImage) -> String {
    let mut out = format!("{}: {} ({} bytes)", image.url, image.format, image.bytes.len());
    if let Some((width, height)) = image.dimensions {
        out.push_str(&format!(", {}x{}", width, height));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageFormat;

    #[test]
    fn test_describe() {
        let image = RemoteImage {
            url: "http://example.com/a.gif".to_string(),
            format: ImageFormat::Gif,
            bytes: vec![0; 12],
            dimensions: Some((10, 5)),
        };
        assert_eq!(describe(&image), "http://example.com/a.gif: gif (12 bytes), 10x5");

        let image = RemoteImage {
            dimensions: None,
            format: ImageFormat::Jpeg,
            ..image
        };
        assert_eq!(describe(&image), "http://example.com/a.gif: jpeg (12 bytes)");
    }
}
