use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Browser color scheme a theme asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

/// One entry of the theme catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub css_class: &'static str,
    /// Base map imagery style used with this theme.
    pub map_style: &'static str,
    pub color_scheme: ColorScheme,
    /// Value for the `theme-color` meta tag.
    pub meta_color: &'static str,
    pub selectable: bool,
}

pub const THEME_CLASS_PREFIX: &str = "theme-";

/// Themes offered in the theme picker. The first one is the fallback.
pub const COLOR_THEMES: [ThemeDefinition; 3] = [
    ThemeDefinition {
        id: "light",
        label: "Light",
        css_class: "theme-light",
        map_style: "light",
        color_scheme: ColorScheme::Light,
        meta_color: "#ffffff",
        selectable: true,
    },
    ThemeDefinition {
        id: "dark",
        label: "Dark",
        css_class: "theme-dark",
        map_style: "dark",
        color_scheme: ColorScheme::Dark,
        meta_color: "#050914",
        selectable: true,
    },
    ThemeDefinition {
        id: "night",
        label: "Night",
        css_class: "theme-night",
        map_style: "night",
        color_scheme: ColorScheme::Dark,
        meta_color: "#041f1c",
        selectable: true,
    },
];

/// Theme used by the guided story mode; never shown in the picker.
pub const CINEMATIC_THEME: ThemeDefinition = ThemeDefinition {
    id: "story",
    label: "Story",
    css_class: "theme-story",
    map_style: "dark",
    color_scheme: ColorScheme::Dark,
    meta_color: "#170b1c",
    selectable: false,
};

pub const FALLBACK_THEME_ID: &str = COLOR_THEMES[0].id;

/// Every known theme, picker themes first.
pub fn all_themes() -> impl Iterator<Item = &'static ThemeDefinition> {
    COLOR_THEMES.iter().chain(std::iter::once(&CINEMATIC_THEME))
}

pub fn theme_definition(id: &str) -> Option<&'static ThemeDefinition> {
    all_themes().find(|t| t.id == id)
}

/// `(id, label)` pairs for the theme picker.
pub fn selectable_themes() -> Vec<(&'static str, &'static str)> {
    COLOR_THEMES.iter().map(|t| (t.id, t.label)).collect()
}

/// Map style for a theme, `light` when the theme is unknown.
pub fn map_style_for_theme(id: &str) -> &'static str {
    theme_definition(id).map(|t| t.map_style).unwrap_or("light")
}

pub fn meta_color_for_theme(id: &str) -> Option<&'static str> {
    theme_definition(id).map(|t| t.meta_color)
}

/// Returns `id` if it names a known theme, otherwise the fallback theme.
pub fn normalize_theme_id(id: &str) -> &'static str {
    theme_definition(id).map(|t| t.id).unwrap_or(FALLBACK_THEME_ID)
}

/// Initial theme derived from the operating system's dark-mode preference.
pub fn theme_for_os_preference(prefers_dark: bool) -> &'static str {
    if prefers_dark { "dark" } else { "light" }
}

/// Map style actually shown: satellite imagery overrides the theme's style.
pub fn effective_map_style(theme_id: &str, satellite_view: bool) -> &'static str {
    if satellite_view {
        "satellite"
    } else {
        map_style_for_theme(theme_id)
    }
}

/// Source of CSS custom property values (`--name` -> value).
pub trait ThemeVariables {
    fn variable(&self, name: &str) -> Option<String>;
}

impl ThemeVariables for HashMap<String, String> {
    fn variable(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

static VAR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^var\(\s*(--[\w-]+)\s*(?:,\s*([^)]+))?\s*\)$").expect("valid regex")
});

/// Resolves a color-like string against theme variables.
///
/// Accepts raw colors (returned trimmed), `--name` references and
/// `var(--name, fallback)` expressions. Empty input yields `fallback`.
pub fn resolve_theme_color<V: ThemeVariables + ?Sized>(
    value: &str,
    vars: &V,
    fallback: Option<&str>,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return fallback.map(str::to_string);
    }

    if let Some(caps) = VAR_REFERENCE.captures(trimmed) {
        if let Some(resolved) = vars.variable(&caps[1]) {
            return Some(resolved);
        }
        if let Some(inline) = caps.get(2).map(|m| m.as_str().trim()) {
            if !inline.is_empty() {
                return Some(inline.to_string());
            }
        }
        return fallback.map(str::to_string);
    }

    if trimmed.starts_with("--") {
        if let Some(resolved) = vars.variable(trimmed) {
            return Some(resolved);
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("--primary".to_string(), " #0ea5e9 ".to_string());
        m.insert("--blank".to_string(), "   ".to_string());
        m
    }

    #[test]
    fn test_catalogue_lookup() {
        assert_eq!(theme_definition("night").map(|t| t.label), Some("Night"));
        assert_eq!(theme_definition("story").map(|t| t.selectable), Some(false));
        assert!(theme_definition("sepia").is_none());
        assert_eq!(all_themes().count(), 4);
    }

    #[test]
    fn test_selectable_excludes_story() {
        let ids: Vec<_> = selectable_themes().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["light", "dark", "night"]);
    }

    #[test]
    fn test_map_style_and_meta_color() {
        assert_eq!(map_style_for_theme("story"), "dark");
        assert_eq!(map_style_for_theme("unknown"), "light");
        assert_eq!(meta_color_for_theme("dark"), Some("#050914"));
        assert_eq!(meta_color_for_theme("unknown"), None);
        assert_eq!(effective_map_style("night", true), "satellite");
        assert_eq!(effective_map_style("night", false), "night");
    }

    #[test]
    fn test_normalize_and_os_preference() {
        assert_eq!(normalize_theme_id("story"), "story");
        assert_eq!(normalize_theme_id("neon"), "light");
        assert_eq!(theme_for_os_preference(true), "dark");
        assert_eq!(theme_for_os_preference(false), "light");
    }

    #[test]
    fn test_css_class_matches_prefix() {
        for theme in all_themes() {
            assert_eq!(theme.css_class, format!("{}{}", THEME_CLASS_PREFIX, theme.id));
        }
    }

    #[test]
    fn test_resolve_raw_color() {
        assert_eq!(resolve_theme_color(" #fff ", &vars(), None), Some("#fff".to_string()));
    }

    #[test]
    fn test_resolve_var_reference() {
        let v = vars();
        assert_eq!(
            resolve_theme_color("var(--primary)", &v, None),
            Some("#0ea5e9".to_string())
        );
        assert_eq!(
            resolve_theme_color("var(--border-wall-color, #f97316)", &v, None),
            Some("#f97316".to_string())
        );
        assert_eq!(
            resolve_theme_color("var(--blank)", &v, Some("#000")),
            Some("#000".to_string())
        );
    }

    #[test]
    fn test_resolve_bare_variable_name() {
        let v = vars();
        assert_eq!(resolve_theme_color("--primary", &v, None), Some("#0ea5e9".to_string()));
        assert_eq!(resolve_theme_color("--missing", &v, None), Some("--missing".to_string()));
    }

    #[test]
    fn test_resolve_empty_uses_fallback() {
        assert_eq!(resolve_theme_color("  ", &vars(), Some("#111")), Some("#111".to_string()));
        assert_eq!(resolve_theme_color("", &vars(), None), None);
    }
}
