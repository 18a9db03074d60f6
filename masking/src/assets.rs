//! Loading the bundled background image.

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("asset {} not found", .0.display())]
    NotFound(std::path::PathBuf),
    #[error(transparent)]
    Decode(#[from] image::ImageError),
}

/// Read and decode the image at `path`.
pub fn try_load_image(path: &std::path::Path) -> Result<image::RgbaImage, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.to_owned()));
    }
    Ok(image::open(path)?.into_rgba8())
}

/// Load the background image. A missing or unreadable asset leaves the background unset.
#[must_use]
pub fn load_background(path: &std::path::Path) -> Option<image::RgbaImage> {
    match try_load_image(path) {
        Ok(image) => {
            log::info!(
                "loaded {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            Some(image)
        }
        Err(e) => {
            log::warn!("no background image: {e}");
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn missing_asset_is_none() {
        let path = std::env::temp_dir().join("masking-test-definitely-missing.png");
        assert!(matches!(try_load_image(&path), Err(AssetError::NotFound(_))));
        assert!(load_background(&path).is_none());
    }
    #[test]
    fn undecodable_asset_is_none() {
        let path = std::env::temp_dir().join(format!(
            "masking-test-garbage-{}.png",
            std::process::id()
        ));
        std::fs::write(&path, b"certainly not a png").unwrap();
        let result = try_load_image(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(AssetError::Decode(_))));
    }
    #[test]
    fn png_round_trips() {
        let path = std::env::temp_dir().join(format!("masking-test-{}.png", std::process::id()));
        let image = image::RgbaImage::from_fn(3, 2, |x, y| {
            image::Rgba([x as u8 * 80, y as u8 * 100, 7, 255])
        });
        image.save(&path).unwrap();
        let loaded = load_background(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, Some(image));
    }
}
