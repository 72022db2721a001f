// Cluster color palettes

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const DEFAULT: &[&str] = &[
    "#E76B74", "#2bb59a", "#d7af70", "#5F0A87", "#3d7ab8", "#c45b9e", "#7a8f3c", "#e08a3c",
];

const PASTEL: &[&str] = &[
    "#8dd3c7", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5", "#bc80bd",
];

const MONO: &[&str] = &["#2f2f2f", "#4f4f4f", "#6f6f6f", "#8f8f8f"];

/// Names accepted by [`Palette::named`]
pub const PALETTE_NAMES: &[&str] = &["default", "pastel", "mono"];

/// An ordered, non-empty sequence of colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Create a palette from explicit colors
    pub fn new(colors: Vec<String>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::config_validation("palette needs at least one color"));
        }
        if colors.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::config_validation("palette colors must not be blank"));
        }
        Ok(Self { colors })
    }

    /// Look up a built-in palette by name
    pub fn named(name: &str) -> Option<Self> {
        let colors = match name {
            "default" => DEFAULT,
            "pastel" => PASTEL,
            "mono" => MONO,
            _ => return None,
        };
        Some(Self {
            colors: colors.iter().map(|c| c.to_string()).collect(),
        })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Assign a color to each key in order, cycling when keys outnumber colors
    pub fn assign<'a, I>(&self, keys: I) -> IndexMap<&'a str, &str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .zip(self.colors.iter().map(String::as_str).cycle())
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = Error;

    fn try_from(colors: Vec<String>) -> Result<Self> {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_palettes() {
        for name in PALETTE_NAMES {
            let palette = Palette::named(name).unwrap();
            assert!(!palette.is_empty());
        }
        assert!(Palette::named("neon").is_none());
    }

    #[test]
    fn test_default_starts_with_classic_colors() {
        let palette = Palette::default();
        assert_eq!(&palette.colors()[..4], ["#E76B74", "#2bb59a", "#d7af70", "#5F0A87"]);
        assert_eq!(Some(palette), Palette::named("default"));
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(Palette::new(vec![]).is_err());
        assert!(Palette::new(vec!["  ".to_string()]).is_err());
    }

    #[test]
    fn test_assign_in_order() {
        let palette = Palette::new(vec!["red".into(), "green".into(), "blue".into()]).unwrap();
        let colors = palette.assign(["source", "staging"]);
        assert_eq!(colors["source"], "red");
        assert_eq!(colors["staging"], "green");
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_assign_cycles() {
        let palette = Palette::new(vec!["red".into(), "green".into()]).unwrap();
        let colors = palette.assign(["a", "b", "c", "d", "e"]);
        let assigned: Vec<&str> = colors.values().copied().collect();
        assert_eq!(assigned, vec!["red", "green", "red", "green", "red"]);
    }

    #[test]
    fn test_deserialize_from_list() {
        let palette: Palette = serde_json::from_str(r##"["#000", "#fff"]"##).unwrap();
        assert_eq!(palette.len(), 2);
        assert!(serde_json::from_str::<Palette>("[]").is_err());
    }
}
