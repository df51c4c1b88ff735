use gpu::DecodedImage;

use crate::config::ViewerConfig;
use crate::error::AssetError;

/// Fetches and decodes an image. Decoding lives with the host: the browser
/// uses its own fetch, tests use in-memory images.
pub trait AssetLoader {
    fn load(&mut self, path: &str) -> Result<DecodedImage, AssetError>;
}

/// Named surface textures available for the globe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureCatalog {
    asset_root: String,
    names: Vec<String>,
    default_name: String,
}

impl TextureCatalog {
    pub fn new(
        asset_root: impl Into<String>,
        names: Vec<String>,
        default_name: impl Into<String>,
    ) -> Self {
        Self {
            asset_root: asset_root.into(),
            names,
            default_name: default_name.into(),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(
            config.asset_root.clone(),
            config.textures.clone(),
            config.default_texture.clone(),
        )
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Asset path for `name`, or `None` when it isn't in the catalog.
    pub fn path(&self, name: &str) -> Option<String> {
        if !self.contains(name) {
            return None;
        }
        let root = self.asset_root.trim_end_matches('/');
        Some(if root.is_empty() {
            name.to_string()
        } else {
            format!("{root}/{name}")
        })
    }
}

/// An outstanding texture load. Only the request with the newest generation
/// may be applied; older ones are stale by the time they complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRequest {
    pub name: String,
    pub path: String,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Applied { name: String },
    Stale { name: String, generation: u64 },
}

#[cfg(test)]
mod tests {
    use super::TextureCatalog;
    use crate::config::ViewerConfig;

    #[test]
    fn default_catalog_matches_shipped_assets() {
        let catalog = TextureCatalog::from_config(&ViewerConfig::default());
        assert_eq!(catalog.names().len(), 7);
        assert_eq!(catalog.default_name(), "earth_vegitation.jpg");
        assert_eq!(
            catalog.path("earth_pollution.png").as_deref(),
            Some("assets/earth_pollution.png")
        );
        assert_eq!(catalog.path("moon.png"), None);
    }

    #[test]
    fn asset_root_slashes_are_normalized() {
        let names = vec!["a.png".to_string()];
        let catalog = TextureCatalog::new("static/", names.clone(), "a.png");
        assert_eq!(catalog.path("a.png").as_deref(), Some("static/a.png"));
        let bare = TextureCatalog::new("", names, "a.png");
        assert_eq!(bare.path("a.png").as_deref(), Some("a.png"));
    }
}
