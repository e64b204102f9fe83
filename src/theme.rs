// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Named visual templates consulted by the badge renderer.
//!
//! A [`Theme`] carries the SVG body and text templates together with default
//! colors and geometry. The [`ThemeRegistry`] is populated once at process
//! start and treated as read-only afterwards, so concurrent readers need no
//! locking. Template placeholders are validated eagerly: a template that
//! references a placeholder the renderer does not supply fails validation
//! with [`Error::TemplateMismatch`] instead of degrading at request time.

use std::collections::HashMap;

use crate::error::Error;

/// Name of the theme used when a requested theme is not registered.
pub const DEFAULT_THEME: &str = "flat";

/// Placeholders the renderer supplies when filling a body template.
const BODY_PLACEHOLDERS: &[&str] = &["width", "height", "background", "text", "animation"];

/// Placeholders the renderer supplies when filling a text template.
const TEXT_PLACEHOLDERS: &[&str] = &["text_color", "font_size", "icon", "label", "value"];

/// Immutable visual template for a badge style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Registry name of the theme.
    pub name:               String,
    /// SVG document template with geometry, background, and text placeholders.
    pub body_template:      String,
    /// Text element template with color, font, icon, label, and value
    /// placeholders.
    pub text_template:      String,
    /// Background color applied when no override or heuristic color wins.
    pub default_background: String,
    /// Fill color for the badge text.
    pub default_text_color: String,
    /// Badge height in pixels.
    pub height:             u32
}

/// Read-only collection of themes keyed by name.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: HashMap<String, Theme>
}

impl ThemeRegistry {
    /// Creates a registry containing the built-in themes.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            themes: HashMap::new()
        };
        for theme in builtin_themes() {
            registry.register(theme);
        }
        registry
    }

    /// Registers a theme, replacing any previous theme with the same name.
    pub fn register(&mut self, theme: Theme) {
        self.themes.insert(theme.name.clone(), theme);
    }

    /// Returns the theme registered under `name`, falling back to
    /// [`DEFAULT_THEME`] for unknown names. Never fails.
    ///
    /// # Panics
    ///
    /// Panics if the default theme is missing, which cannot happen for a
    /// registry built through [`ThemeRegistry::with_builtins`].
    pub fn get(&self, name: &str) -> &Theme {
        self.themes.get(name).unwrap_or_else(|| {
            self.themes
                .get(DEFAULT_THEME)
                .expect("default theme must be registered")
        })
    }

    /// Returns the sorted names of all registered themes.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validates that every registered template only references placeholders
    /// the renderer supplies.
    ///
    /// Intended to run at startup so a malformed registry fails loudly before
    /// serving traffic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateMismatch`] naming the offending theme and
    /// placeholder.
    pub fn validate(&self) -> Result<(), Error> {
        for theme in self.themes.values() {
            check_placeholders(&theme.name, &theme.body_template, BODY_PLACEHOLDERS)?;
            check_placeholders(&theme.name, &theme.text_template, TEXT_PLACEHOLDERS)?;
        }
        Ok(())
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Substitutes `{placeholder}` tokens in `template` from `values`.
///
/// Substituted values are not rescanned, so injected fragments may contain
/// braces. A token whose name is not present in `values` yields
/// [`Error::TemplateMismatch`]; values without a matching token are ignored,
/// which lets themes opt out of optional slots such as the animation block.
pub(crate) fn fill_template(
    theme: &str,
    template: &str,
    values: &[(&str, &str)]
) -> Result<String, Error> {
    let mut output = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if end > 0 && is_placeholder_name(&after[..end]) => {
                let name = &after[..end];
                match values.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => output.push_str(value),
                    None => {
                        return Err(Error::TemplateMismatch {
                            theme:       theme.to_owned(),
                            placeholder: name.to_owned()
                        });
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    Ok(output)
}

fn is_placeholder_name(candidate: &str) -> bool {
    candidate
        .chars()
        .all(|character| character.is_ascii_lowercase() || character == '_')
}

fn check_placeholders(theme: &str, template: &str, allowed: &[&str]) -> Result<(), Error> {
    let pairs: Vec<(&str, &str)> = allowed.iter().map(|name| (*name, "")).collect();
    fill_template(theme, template, &pairs).map(|_| ())
}

const TEXT_SANS: &str = concat!(
    "<text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" ",
    "fill=\"{text_color}\" font-family=\"DejaVu Sans,Verdana,Geneva,sans-serif\" ",
    "font-size=\"{font_size}\">{icon}{label}: {value}</text>"
);

fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme {
            name:               "flat".to_owned(),
            body_template:      concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">",
                "{animation}",
                "<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>",
                "{text}",
                "</svg>"
            )
            .to_owned(),
            text_template:      TEXT_SANS.to_owned(),
            default_background: "#555".to_owned(),
            default_text_color: "#fff".to_owned(),
            height:             20
        },
        Theme {
            name:               "flat-square".to_owned(),
            body_template:      concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">",
                "{animation}",
                "<rect width=\"100%\" height=\"100%\" rx=\"3\" fill=\"{background}\"/>",
                "{text}",
                "</svg>"
            )
            .to_owned(),
            text_template:      TEXT_SANS.to_owned(),
            default_background: "#555".to_owned(),
            default_text_color: "#fff".to_owned(),
            height:             20
        },
        Theme {
            name:               "plastic".to_owned(),
            body_template:      concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">",
                "<defs><linearGradient id=\"a\" x2=\"0\" y2=\"100%\">",
                "<stop offset=\"0\" stop-color=\"#fff\" stop-opacity=\".1\"/>",
                "<stop offset=\"1\" stop-opacity=\".1\"/>",
                "</linearGradient></defs>",
                "<rect width=\"100%\" height=\"100%\" rx=\"4\" ry=\"4\" fill=\"{background}\"/>",
                "<rect width=\"100%\" height=\"100%\" rx=\"4\" ry=\"4\" fill=\"url(#a)\"/>",
                "{text}",
                "</svg>"
            )
            .to_owned(),
            text_template:      concat!(
                "<text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" ",
                "fill=\"{text_color}\" font-family=\"DejaVu Sans,Verdana,Geneva,sans-serif\" ",
                "font-size=\"{font_size}\" font-weight=\"bold\">{icon}{label}: {value}</text>"
            )
            .to_owned(),
            default_background: "#555".to_owned(),
            default_text_color: "#fff".to_owned(),
            height:             18
        },
        Theme {
            name:               "minimal".to_owned(),
            body_template:      concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">",
                "{animation}",
                "<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>",
                "{text}",
                "</svg>"
            )
            .to_owned(),
            text_template:      concat!(
                "<text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" ",
                "fill=\"{text_color}\" font-family=\"Arial, sans-serif\" ",
                "font-size=\"{font_size}\">{icon}{label}: {value}</text>"
            )
            .to_owned(),
            default_background: "#4c1".to_owned(),
            default_text_color: "#fff".to_owned(),
            height:             20
        },
        Theme {
            name:               "neon".to_owned(),
            body_template:      concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">",
                "<defs><linearGradient id=\"neon\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"0%\">",
                "<stop offset=\"0%\" stop-color=\"#00ff00\"/>",
                "<stop offset=\"100%\" stop-color=\"#00ffff\"/>",
                "</linearGradient></defs>",
                "<rect width=\"100%\" height=\"100%\" fill=\"url(#neon)\" ",
                "stroke=\"#00ff00\" stroke-width=\"2\"/>",
                "{text}",
                "</svg>"
            )
            .to_owned(),
            text_template:      concat!(
                "<text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" ",
                "fill=\"{text_color}\" font-family=\"Courier New, monospace\" ",
                "font-size=\"{font_size}\" font-weight=\"bold\">{icon}{label}: {value}</text>"
            )
            .to_owned(),
            default_background: "#00ff00".to_owned(),
            default_text_color: "#000".to_owned(),
            height:             20
        },
        Theme {
            name:               "pixel".to_owned(),
            body_template:      concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">",
                "<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>",
                "{text}",
                "</svg>"
            )
            .to_owned(),
            text_template:      concat!(
                "<text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" ",
                "fill=\"{text_color}\" font-family=\"monospace\" ",
                "font-size=\"10\" font-weight=\"bold\">{icon}{label}: {value}</text>"
            )
            .to_owned(),
            default_background: "#000".to_owned(),
            default_text_color: "#0f0".to_owned(),
            height:             20
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_validates() {
        let registry = ThemeRegistry::with_builtins();
        registry.validate().expect("built-in themes must validate");
    }

    #[test]
    fn unknown_theme_falls_back_to_flat() {
        let registry = ThemeRegistry::with_builtins();
        let theme = registry.get("does-not-exist");
        assert_eq!(theme.name, DEFAULT_THEME);
    }

    #[test]
    fn names_are_sorted() {
        let registry = ThemeRegistry::with_builtins();
        let names = registry.names();
        assert!(names.contains(&"flat"));
        assert!(names.contains(&"pixel"));
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn fill_template_substitutes_known_placeholders() {
        let output = fill_template("flat", "w={width} h={height}", &[
            ("width", "80"),
            ("height", "20")
        ])
        .expect("substitution should succeed");
        assert_eq!(output, "w=80 h=20");
    }

    #[test]
    fn fill_template_rejects_unknown_placeholder() {
        let error = fill_template("custom", "fill={glyph}", &[("width", "80")])
            .expect_err("unknown placeholder must fail");
        match error {
            Error::TemplateMismatch {
                ref theme,
                ref placeholder
            } => {
                assert_eq!(theme, "custom");
                assert_eq!(placeholder, "glyph");
            }
            other => panic!("expected template mismatch, got {other:?}")
        }
    }

    #[test]
    fn fill_template_leaves_non_placeholder_braces_alone() {
        let output = fill_template("flat", "@keyframes pulse { 0% { opacity: 1; } }", &[])
            .expect("literal braces are not placeholders");
        assert_eq!(output, "@keyframes pulse { 0% { opacity: 1; } }");
    }

    #[test]
    fn fill_template_ignores_unused_values() {
        let output = fill_template("pixel", "static", &[("width", "80")])
            .expect("unused values are allowed");
        assert_eq!(output, "static");
    }

    #[test]
    fn registering_custom_theme_with_bad_placeholder_fails_validation() {
        let mut registry = ThemeRegistry::with_builtins();
        registry.register(Theme {
            name:               "broken".to_owned(),
            body_template:      "<svg>{missing}</svg>".to_owned(),
            text_template:      "<text>{label}</text>".to_owned(),
            default_background: "#555".to_owned(),
            default_text_color: "#fff".to_owned(),
            height:             20
        });
        assert!(registry.validate().is_err());
    }
}
