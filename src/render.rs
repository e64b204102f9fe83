// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Theme-driven SVG badge renderer.
//!
//! Rendering is a pure function of the request and the registries: geometry
//! is computed from character counts rather than text measurement, colors
//! resolve through a fixed palette, and label/value text is escaped exactly
//! once before template substitution. The renderer never performs I/O and
//! never suspends.

use serde::Serialize;

use crate::{
    error::Error,
    escape::escape_markup,
    icon::IconRegistry,
    theme::{ThemeRegistry, fill_template}
};

/// Fixed font size used by every built-in text template.
const FONT_SIZE: u32 = 11;

/// Pulsing-opacity block injected when a request asks for animation.
///
/// Themes without an animation slot in their body template ignore the block
/// silently.
const ANIMATION_BLOCK: &str = concat!(
    "<style>@keyframes pulse { 0% { opacity: 1; } 50% { opacity: 0.5; } ",
    "100% { opacity: 1; } } rect { animation: pulse 2s infinite; }</style>"
);

/// Named color palette shared by the heuristic and explicit overrides.
const PALETTE: &[(&str, &str)] = &[
    ("green", "#4c1"),
    ("yellow", "#dfb317"),
    ("orange", "#fe7d37"),
    ("red", "#e05d44"),
    ("blue", "#007ec6"),
    ("grey", "#555"),
    ("lightgrey", "#9f9f9f"),
];

/// Input to a single badge rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeRequest {
    /// Left-hand text of the badge.
    pub label:    String,
    /// Right-hand text of the badge.
    pub value:    String,
    /// Theme name; unknown names fall back to the default theme.
    pub style:    String,
    /// Optional background override, either a palette name or a raw hex
    /// string.
    pub color:    Option<String>,
    /// Optional icon name resolved through the icon registry.
    pub icon:     Option<String>,
    /// Whether the pulsing animation block should be injected.
    pub animated: bool
}

impl BadgeRequest {
    /// Creates a request with the default style and no overrides.
    pub fn new<L, V>(label: L, value: V) -> Self
    where
        L: Into<String>,
        V: Into<String>
    {
        Self {
            label:    label.into(),
            value:    value.into(),
            style:    crate::theme::DEFAULT_THEME.to_owned(),
            color:    None,
            icon:     None,
            animated: false
        }
    }
}

/// A rendered badge document together with its geometry.
///
/// The geometry feeds the composer, which offsets badges by their declared
/// width and height instead of re-measuring the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBadge {
    /// Complete SVG document.
    pub svg:    String,
    /// Badge width in pixels.
    pub width:  u32,
    /// Badge height in pixels.
    pub height: u32
}

/// Returns the hex value for a named palette color.
pub fn palette_hex(name: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, hex)| *hex)
}

/// Classifies a value string into a semantic color band.
///
/// Fully numeric values map to red above 100, orange above 50, and green
/// otherwise; everything else is blue. Deterministic for every input.
///
/// # Examples
///
/// ```
/// use badgecast::color_band;
///
/// assert_eq!(color_band("150"), "red");
/// assert_eq!(color_band("75"), "orange");
/// assert_eq!(color_band("10"), "green");
/// assert_eq!(color_band("abc"), "blue");
/// ```
pub fn color_band(value: &str) -> &'static str {
    if !value.is_empty() && value.chars().all(|character| character.is_ascii_digit()) {
        // Values too large for u64 are still numeric and far above the band
        // cutoffs.
        match value.parse::<u64>() {
            Ok(number) if number > 100 => "red",
            Ok(number) if number > 50 => "orange",
            Ok(_) => "green",
            Err(_) => "red"
        }
    } else {
        "blue"
    }
}

/// Resolves the badge background color.
///
/// Precedence: explicit override (palette name or raw hex) over the
/// value-based band heuristic. Unknown override names fall through to the
/// heuristic rather than failing.
pub fn resolve_background(color: Option<&str>, value: &str) -> String {
    if let Some(requested) = color {
        if let Some(hex) = palette_hex(requested) {
            return hex.to_owned();
        }
        if requested.starts_with('#') {
            return requested.to_owned();
        }
    }
    palette_hex(color_band(value))
        .unwrap_or("#007ec6")
        .to_owned()
}

/// Computes the badge width from label/value character counts.
///
/// Rough estimation of eight pixels per character plus padding, with a fixed
/// sixteen pixel reservation when an icon is requested. Never below 80.
pub fn badge_width(label: &str, value: &str, has_icon: bool) -> u32 {
    let label_chars = label.chars().count() as u32;
    let value_chars = value.chars().count() as u32;
    let icon_width = if has_icon { 16 } else { 0 };
    (label_chars * 8 + value_chars * 8 + icon_width + 20).max(80)
}

/// Renders a badge request into an SVG document.
///
/// The output is well-formed for every label/value pair, including empty
/// ones. The only failure mode is [`Error::TemplateMismatch`], which cannot
/// occur for a registry that passed startup validation.
///
/// # Errors
///
/// Returns [`Error::TemplateMismatch`] when the resolved theme references a
/// placeholder the renderer does not supply.
///
/// # Examples
///
/// ```
/// use badgecast::{BadgeRequest, IconRegistry, ThemeRegistry, render};
///
/// # fn main() -> Result<(), badgecast::Error> {
/// let themes = ThemeRegistry::with_builtins();
/// let icons = IconRegistry::with_builtins();
/// let badge = render(&BadgeRequest::new("stars", "42"), &themes, &icons)?;
/// assert!(badge.svg.contains("stars: 42"));
/// # Ok(())
/// # }
/// ```
pub fn render(
    request: &BadgeRequest,
    themes: &ThemeRegistry,
    icons: &IconRegistry
) -> Result<RenderedBadge, Error> {
    let theme = themes.get(&request.style);
    let background = resolve_background(request.color.as_deref(), &request.value);

    let icon_name = request.icon.as_deref().unwrap_or("");
    let icon_fragment = if icon_name.is_empty() {
        String::new()
    } else {
        icons.fragment(icon_name)
    };

    // Width reserves icon space based on the request, matching the geometry
    // clients see even when the icon name is unknown.
    let width = badge_width(&request.label, &request.value, !icon_name.is_empty());
    let height = theme.height;

    let label = escape_markup(&request.label);
    let value = escape_markup(&request.value);
    let font_size = FONT_SIZE.to_string();

    let text = fill_template(&theme.name, &theme.text_template, &[
        ("text_color", theme.default_text_color.as_str()),
        ("font_size", font_size.as_str()),
        ("icon", icon_fragment.as_str()),
        ("label", label.as_ref()),
        ("value", value.as_ref())
    ])?;

    let animation = if request.animated { ANIMATION_BLOCK } else { "" };
    let width_text = width.to_string();
    let height_text = height.to_string();

    let svg = fill_template(&theme.name, &theme.body_template, &[
        ("width", width_text.as_str()),
        ("height", height_text.as_str()),
        ("background", background.as_str()),
        ("text", text.as_str()),
        ("animation", animation)
    ])?;

    Ok(RenderedBadge {
        svg,
        width,
        height
    })
}
