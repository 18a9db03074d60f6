use masking_core::brush::Tool;

use crate::stylus_events::InputPolicy;

const DOCUMENTATION: &str = r#"# Masking preferences. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing keys take their default value.

# asset_path    - image shown as the background at startup, relative to the working directory.
# window_size   - [width, height] of the window, in physical pixels.
# scale_factor  - physical pixels per logical pixel.
# input_policy  - "any" lets any pointer draw, "pen" only lets a pen draw.
# tool          - starting tool: "pen", "marker", "pencil" or "eraser".

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub asset_path: std::path::PathBuf,
    pub window_size: [u32; 2],
    pub scale_factor: f32,
    pub input_policy: InputPolicy,
    pub tool: Tool,
}
impl Default for Preferences {
    fn default() -> Self {
        Self {
            asset_path: ["assets", "document.png"].iter().collect(),
            window_size: [800, 600],
            scale_factor: 1.0,
            input_policy: InputPolicy::Any,
            tool: Tool::Pen,
        }
    }
}
impl Preferences {
    const FILENAME: &'static str = "preferences.toml";
    /// Load the user's preferences, or defaults if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            None => {
                log::warn!("No preferences dir found, defaulting.");
                Self::default()
            }
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let loaded: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let preferences = Self::parse(&string)?;
            Ok(preferences)
        };
        match loaded {
            Ok(preferences) => preferences,
            Err(e) => {
                log::info!("Preferences at {} not used ({e:#}), defaulting.", path.display());
                Self::default()
            }
        }
    }
    /// Parse preferences from toml. Out-of-range values are replaced by their defaults.
    pub fn parse(string: &str) -> Result<Self, toml::de::Error> {
        let mut preferences: Self = toml::from_str(string)?;
        let defaults = Self::default();
        if !(preferences.scale_factor.is_finite() && preferences.scale_factor > 0.0) {
            log::warn!("Ignoring scale_factor {}", preferences.scale_factor);
            preferences.scale_factor = defaults.scale_factor;
        }
        if preferences.window_size.contains(&0) {
            log::warn!("Ignoring window_size {:?}", preferences.window_size);
            preferences.window_size = defaults.window_size;
        }
        Ok(preferences)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicitly do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(preferences, string)?;
        Ok(())
    }
}
