// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Inline vector icon fragments composed into badge output.

use std::collections::HashMap;

/// Read-only collection of named inline SVG path fragments.
///
/// Populated once at process start. A missing icon is not an error: the
/// renderer receives an empty fragment and the badge simply has no icon.
#[derive(Debug, Clone)]
pub struct IconRegistry {
    icons: HashMap<String, String>
}

impl IconRegistry {
    /// Creates a registry containing the built-in icons.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            icons: HashMap::new()
        };
        for (name, path) in builtin_icons() {
            registry.register(name, path);
        }
        registry
    }

    /// Registers an icon path fragment under `name`.
    pub fn register<N, P>(&mut self, name: N, path: P)
    where
        N: Into<String>,
        P: Into<String>
    {
        self.icons.insert(name.into(), path.into());
    }

    /// Returns the positioned SVG fragment for `name`, or an empty string when
    /// the icon is unknown or `name` is empty.
    pub fn fragment(&self, name: &str) -> String {
        match self.icons.get(name) {
            Some(path) => {
                format!("<g transform=\"translate(5,2) scale(0.8)\">{path}</g> ")
            }
            None => String::new()
        }
    }

    /// Returns the sorted names of all registered icons.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.icons.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn builtin_icons() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "github",
            "<path d=\"M12 0c-6.626 0-12 5.373-12 12 0 5.302 3.438 9.8 8.207 11.387.599.111.793-.261.793-.577v-2.234c-3.338.726-4.033-1.416-4.033-1.416-.546-1.387-1.333-1.756-1.333-1.756-1.089-.745.083-.729.083-.729 1.205.084 1.839 1.237 1.839 1.237 1.07 1.834 2.807 1.304 3.492.997.107-.775.418-1.305.762-1.604-2.665-.305-5.467-1.334-5.467-5.931 0-1.311.469-2.381 1.236-3.221-.124-.303-.535-1.524.117-3.176 0 0 1.008-.322 3.301 1.23.957-.266 1.983-.399 3.003-.404 1.02.005 2.047.138 3.006.404 2.291-1.552 3.297-1.23 3.297-1.23.653 1.653.242 2.874.118 3.176.77.84 1.235 1.911 1.235 3.221 0 4.609-2.807 5.624-5.479 5.921.43.372.823 1.102.823 2.222v3.293c0 .319.192.694.801.576 4.765-1.589 8.199-6.086 8.199-11.386 0-6.627-5.373-12-12-12z\"/>"
        ),
        (
            "star",
            "<path d=\"M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z\"/>"
        ),
        (
            "flame",
            "<path d=\"M12 0c-6.627 0-12 5.373-12 12s5.373 12 12 12 12-5.373 12-12-5.373-12-12-12zm4.5 9.5c0 1.5-1.5 3-3 3s-3-1.5-3-3c0-1.5 1.5-3 3-3s3 1.5 3 3z\"/>"
        ),
        (
            "bolt",
            "<path d=\"M12 2l-1.5 4.5h-4.5l3.5 2.5-1.5 4.5 3.5-2.5 3.5 2.5-1.5-4.5 3.5-2.5h-4.5z\"/>"
        ),
    ]
}
