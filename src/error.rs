#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the badge pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

/// Unified error type returned by the resolver, renderer, and HTTP boundary.
///
/// The variants mirror the failure taxonomy of the badge pipeline: resolver
/// failures (`UnknownMetric`, `UnknownProvider`, `Upstream`) are converted to
/// a fallback badge at the request boundary, while `TemplateMismatch` marks a
/// registry bug that should be caught by startup validation rather than
/// surfaced to end users.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Requested metric is not defined for the provider.
    #[error("unknown metric {metric:?} for provider {provider:?}")]
    UnknownMetric {
        /// Provider the metric was requested from.
        provider: String,
        /// Metric name that was not recognized.
        metric:   String
    },
    /// Provider or plugin name is not registered.
    #[error("unknown provider {name:?}")]
    UnknownProvider {
        /// Name that failed to resolve to a registered provider.
        name: String
    },
    /// Network failure, non-2xx response, or malformed upstream payload.
    #[error("upstream error: {message}")]
    Upstream {
        /// Human readable message describing the upstream failure.
        message: String
    },
    /// Theme template references a placeholder the renderer does not supply.
    #[error("theme {theme:?} references unknown placeholder {placeholder:?}")]
    TemplateMismatch {
        /// Theme whose template failed substitution.
        theme:       String,
        /// Placeholder name that has no substitution value.
        placeholder: String
    },
    /// Returned when configuration or request inputs violate invariants.
    #[error("invalid configuration: {message}")]
    Config {
        /// Human readable message describing the problem.
        message: String
    }
}

impl Error {
    /// Constructs an [`Error::UnknownMetric`] for the given provider/metric
    /// pair.
    pub fn unknown_metric<P, M>(provider: P, metric: M) -> Self
    where
        P: Into<String>,
        M: Into<String>
    {
        Self::UnknownMetric {
            provider: provider.into(),
            metric:   metric.into()
        }
    }

    /// Constructs an [`Error::UnknownProvider`] from the provided name.
    pub fn unknown_provider<N>(name: N) -> Self
    where
        N: Into<String>
    {
        Self::UnknownProvider {
            name: name.into()
        }
    }

    /// Constructs an [`Error::Upstream`] from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the upstream failure.
    pub fn upstream<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Upstream {
            message: message.into()
        }
    }

    /// Constructs an [`Error::Config`] from the provided displayable value.
    pub fn config<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Config {
            message: message.into()
        }
    }

    /// Returns `true` when the error originates from an upstream call rather
    /// than request validation.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

impl From<octocrab::Error> for Error {
    fn from(error: octocrab::Error) -> Self {
        Self::Upstream {
            message: error.to_string()
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Upstream {
            message: error.to_string()
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Upstream {
            message: error.to_string()
        }
    }
}
