use gloo_net::http::Request;
use gpu::DecodedImage;
use image::imageops::FilterType;
use session::AssetError;

/// Decodes PNG or JPEG bytes to RGBA8, downscaling (aspect kept) so neither
/// side exceeds `max_dim`.
pub fn decode_image(bytes: &[u8], path: &str, max_dim: u32) -> Result<DecodedImage, AssetError> {
    let decode_err = |reason: String| AssetError::Decode {
        path: path.to_string(),
        reason,
    };
    let mut img = image::load_from_memory(bytes).map_err(|e| decode_err(e.to_string()))?;
    if img.width() > max_dim || img.height() > max_dim {
        img = img.resize(max_dim, max_dim, FilterType::Triangle);
    }
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::new(width, height, rgba.into_raw()).map_err(|e| decode_err(e.to_string()))
}

pub async fn fetch_image(path: &str, max_dim: u32) -> Result<DecodedImage, AssetError> {
    let fetch_err = |reason: String| AssetError::Fetch {
        path: path.to_string(),
        reason,
    };
    let resp = Request::get(path)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    if resp.status() == 404 {
        return Err(AssetError::NotFound {
            path: path.to_string(),
        });
    }
    if !resp.ok() {
        return Err(fetch_err(format!("http {}", resp.status())));
    }
    let bytes = resp.binary().await.map_err(|e| fetch_err(e.to_string()))?;
    decode_image(&bytes, path, max_dim)
}

/// Fetches an optional JSON document. A missing file is `Ok(None)`.
pub async fn fetch_optional_text(url: &str) -> Result<Option<String>, AssetError> {
    let fetch_err = |reason: String| AssetError::Fetch {
        path: url.to_string(),
        reason,
    };
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    if resp.status() == 404 {
        return Ok(None);
    }
    if !resp.ok() {
        return Err(fetch_err(format!("http {}", resp.status())));
    }
    resp.text()
        .await
        .map(Some)
        .map_err(|e| fetch_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::decode_image;
    use image::{ImageFormat, Rgba, RgbaImage};
    use session::AssetError;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_to_rgba() {
        let img = decode_image(&png(4, 2), "a.png", 2048).unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
        assert_eq!(&img.pixels()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn oversized_images_are_downscaled() {
        let img = decode_image(&png(64, 32), "big.png", 16).unwrap();
        assert_eq!((img.width(), img.height()), (16, 8));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_image(b"not an image", "x.jpg", 16).unwrap_err();
        assert!(matches!(err, AssetError::Decode { path, .. } if path == "x.jpg"));
    }
}
