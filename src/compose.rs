// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Layout of multiple rendered badges into a single SVG document.

use crate::render::RenderedBadge;

/// Direction along which composed badges are stacked.
///
/// Parsing happens at the request boundary; the composer itself only accepts
/// the two valid layouts, so an unrecognized selector is rejected before any
/// rendering work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Badges placed left to right at increasing x-offsets.
    Horizontal,
    /// Badges stacked top to bottom at increasing y-offsets.
    Vertical
}

impl Layout {
    /// Parses a layout selector, returning `None` for unrecognized input.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None
        }
    }
}

/// Concatenates rendered badges into one SVG document.
///
/// Horizontal layout sums widths and takes the maximum height; each badge is
/// wrapped in a group translated by the running sum of preceding widths.
/// Vertical layout is symmetric with the axes swapped. An empty input yields
/// an empty but well-formed zero-sized document.
///
/// # Examples
///
/// ```
/// use badgecast::{Layout, RenderedBadge, compose};
///
/// let badges = vec![
///     RenderedBadge { svg: "<svg/>".into(), width: 80, height: 20 },
///     RenderedBadge { svg: "<svg/>".into(), width: 100, height: 20 },
/// ];
/// let composed = compose(&badges, Layout::Horizontal);
/// assert!(composed.contains("width=\"180\""));
/// assert!(composed.contains("translate(80, 0)"));
/// ```
pub fn compose(badges: &[RenderedBadge], layout: Layout) -> String {
    let (total_width, total_height) = match layout {
        Layout::Horizontal => (
            badges.iter().map(|badge| badge.width).sum::<u32>(),
            badges.iter().map(|badge| badge.height).max().unwrap_or(0)
        ),
        Layout::Vertical => (
            badges.iter().map(|badge| badge.width).max().unwrap_or(0),
            badges.iter().map(|badge| badge.height).sum::<u32>()
        )
    };

    let mut document = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{total_width}\" height=\"{total_height}\">"
    );

    let mut offset = 0;
    for badge in badges {
        match layout {
            Layout::Horizontal => {
                document.push_str(&format!(
                    "<g transform=\"translate({offset}, 0)\">{}</g>",
                    badge.svg
                ));
                offset += badge.width;
            }
            Layout::Vertical => {
                document.push_str(&format!(
                    "<g transform=\"translate(0, {offset})\">{}</g>",
                    badge.svg
                ));
                offset += badge.height;
            }
        }
    }

    document.push_str("</svg>");
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badge(width: u32, height: u32) -> RenderedBadge {
        RenderedBadge {
            svg: format!("<svg width=\"{width}\" height=\"{height}\"/>"),
            width,
            height
        }
    }

    #[test]
    fn horizontal_layout_sums_widths_and_offsets_groups() {
        let composed = compose(&[badge(80, 20), badge(100, 20)], Layout::Horizontal);
        assert!(composed.contains("width=\"180\" height=\"20\""));
        assert!(composed.contains("translate(0, 0)"));
        assert!(composed.contains("translate(80, 0)"));
    }

    #[test]
    fn vertical_layout_sums_heights_and_takes_max_width() {
        let composed = compose(&[badge(80, 20), badge(100, 18)], Layout::Vertical);
        assert!(composed.contains("width=\"100\" height=\"38\""));
        assert!(composed.contains("translate(0, 0)"));
        assert!(composed.contains("translate(0, 20)"));
    }

    #[test]
    fn empty_input_yields_zero_sized_document() {
        let composed = compose(&[], Layout::Horizontal);
        assert_eq!(
            composed,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"0\" height=\"0\"></svg>"
        );
    }

    #[test]
    fn layout_parsing_rejects_unknown_selectors() {
        assert_eq!(Layout::parse("horizontal"), Some(Layout::Horizontal));
        assert_eq!(Layout::parse("vertical"), Some(Layout::Vertical));
        assert_eq!(Layout::parse("diagonal"), None);
        assert_eq!(Layout::parse(""), None);
    }
}
