// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Escaping of untrusted text before embedding it in SVG markup.

use std::borrow::Cow;

/// Escapes the five markup-significant characters for safe SVG embedding.
///
/// The ampersand is handled by the same single pass as the other characters,
/// so already-escaped input is escaped again. Callers must escape exactly
/// once, at render time, and never escape stored or cached values a second
/// time.
///
/// # Examples
///
/// ```
/// use badgecast::escape_markup;
///
/// assert_eq!(escape_markup("<a>&\"'"), "&lt;a&gt;&amp;&quot;&#39;");
/// assert_eq!(escape_markup("plain"), "plain");
/// ```
pub fn escape_markup(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len() + 8);
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}
