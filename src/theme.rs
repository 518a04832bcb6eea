//! Skin support module for the playlist view.
//!
//! This module provides the color side of skinning: named palettes covering
//! the five colors the widget paints with, and a centralized skin manager.
//!
//! # Examples
//!
//! ```
//! use playtree::theme::SkinManager;
//!
//! let manager = SkinManager::new();
//! let dark = manager.get_skin("Dark").unwrap();
//! println!("Dark selection: {:?}", dark.colors.selection);
//! ```

use egui::Color32;
use std::collections::HashMap;

/// Complete color palette for a skin, covering everything the widget draws.
#[derive(Debug, Clone)]
pub struct SkinColors {
    /// Normal label text.
    pub foreground: Color32,
    /// Label text of the currently playing item.
    pub playing: Color32,
    /// First alternating background band.
    pub background1: Color32,
    /// Second alternating background band.
    pub background2: Color32,
    /// Highlight band behind selected rows.
    pub selection: Color32,
}

/// A complete skin definition with metadata and color palette.
#[derive(Debug, Clone)]
pub struct Skin {
    pub name: String,
    pub description: String,
    pub colors: SkinColors,
}

/// Centralized skin manager providing access to all available skins.
pub struct SkinManager {
    skins: HashMap<String, Skin>,
    current_skin_name: String,
}

impl SkinManager {
    /// Creates a new SkinManager initialized with all built-in skins.
    pub fn new() -> Self {
        let mut skins = HashMap::new();

        skins.insert("Classic".to_string(), classic_skin());
        skins.insert("Dark".to_string(), dark_skin());
        skins.insert("High Contrast".to_string(), high_contrast_skin());

        Self {
            skins,
            current_skin_name: "Classic".to_string(),
        }
    }

    /// Retrieves a skin by name.
    pub fn get_skin(&self, name: &str) -> Option<&Skin> {
        self.skins.get(name)
    }

    /// Returns a list of all available skin names.
    pub fn list_skins(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.skins.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Gets the currently selected skin.
    pub fn current_skin(&self) -> &Skin {
        // Built-ins guarantee the current name always resolves.
        self.skins
            .get(&self.current_skin_name)
            .unwrap_or_else(|| self.skins.values().next().expect("built-in skins"))
    }

    /// Sets the current skin by name.
    pub fn set_current_skin(&mut self, name: &str) -> Result<(), String> {
        if self.skins.contains_key(name) {
            self.current_skin_name = name.to_string();
            Ok(())
        } else {
            Err(format!("Skin '{}' not found", name))
        }
    }

    /// Name of the currently selected skin.
    pub fn current_skin_name(&self) -> &str {
        &self.current_skin_name
    }
}

impl Default for SkinManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the Classic skin: light bands, blue highlight.
fn classic_skin() -> Skin {
    Skin {
        name: "Classic".to_string(),
        description: "Light alternating bands with a blue highlight".to_string(),
        colors: SkinColors {
            foreground: Color32::from_rgb(20, 20, 20),
            playing: Color32::from_rgb(200, 60, 20),
            background1: Color32::from_rgb(248, 248, 248),
            background2: Color32::from_rgb(232, 236, 242),
            selection: Color32::from_rgb(180, 200, 255),
        },
    }
}

/// Creates the Dark skin.
fn dark_skin() -> Skin {
    Skin {
        name: "Dark".to_string(),
        description: "Dark bands with a muted blue highlight".to_string(),
        colors: SkinColors {
            foreground: Color32::from_rgb(230, 230, 230),
            playing: Color32::from_rgb(255, 121, 198),
            background1: Color32::from_rgb(39, 39, 39),
            background2: Color32::from_rgb(30, 30, 30),
            selection: Color32::from_rgb(50, 80, 120),
        },
    }
}

/// Creates the High Contrast skin.
fn high_contrast_skin() -> Skin {
    Skin {
        name: "High Contrast".to_string(),
        description: "Black and white with a yellow highlight".to_string(),
        colors: SkinColors {
            foreground: hex_to_color32("#ffffff"),
            playing: hex_to_color32("#00ff00"),
            background1: hex_to_color32("#000000"),
            background2: hex_to_color32("#1a1a1a"),
            selection: hex_to_color32("#b58900"),
        },
    }
}

/// Converts a hex color string (like "#282a36") to Color32
pub fn hex_to_color32(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        Color32::from_rgb(r, g, b)
    } else {
        Color32::from_rgb(0, 0, 0) // Fallback to black
    }
}

/// Adjusts the brightness of a color by a factor (1.0 = no change, >1.0 = brighter, <1.0 = darker)
pub fn adjust_brightness(color: Color32, factor: f32) -> Color32 {
    let r = (color.r() as f32 * factor).min(255.0) as u8;
    let g = (color.g() as f32 * factor).min(255.0) as u8;
    let b = (color.b() as f32 * factor).min(255.0) as u8;
    Color32::from_rgb(r, g, b)
}
