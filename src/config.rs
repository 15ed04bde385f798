//! Configuration types for the conversion engine and batch drivers.
//!
//! All tunable behaviour lives in [`ConversionConfig`], built via its
//! [`ConversionConfigBuilder`]. The engine takes everything it needs from this
//! value; there is no process-wide mutable state.
//!
//! Two leniency rules are expressed as named policies rather than silent
//! fallbacks: [`UnknownFormatPolicy`] and [`SvgWriteFailure`]. Their defaults
//! reproduce the lenient behaviour.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed zoom applied to both axes when rasterising PDF pages.
///
/// Relative to the page's native point size, so a US-Letter page renders at
/// 1836 × 2376 px. Not derived from any target DPI.
pub const PDF_ZOOM: f32 = 3.0;

/// Reference color and per-channel tolerance used for background keying.
///
/// SVG export always keys with [`BackgroundKey::default()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundKey {
    pub color: [u8; 3],
    /// A pixel is background when every channel differs from `color` by
    /// strictly less than this. Zero therefore clears nothing.
    pub tolerance: u8,
}

impl Default for BackgroundKey {
    fn default() -> Self {
        Self {
            color: [255, 255, 255],
            tolerance: 30,
        }
    }
}

/// What to do with a format name that is not in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownFormatPolicy {
    /// Silently write JPEG with a `.jpg` extension. (default)
    #[default]
    FallbackToJpeg,
    /// Fail the file with [`ConvertError::UnknownFormat`].
    Reject,
}

/// What to do when an SVG document cannot be written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SvgWriteFailure {
    /// Log the failure and report the job as successful. (default)
    #[default]
    LogAndContinue,
    /// Fail the enclosing unit (file or page) like any other write.
    Propagate,
}

/// Configuration for a conversion run.
///
/// Built via [`ConversionConfig::builder()`] or [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use docshift::{ConversionConfig, SvgWriteFailure};
///
/// let config = ConversionConfig::builder()
///     .fallback_dpi(150.0)
///     .svg_write_failure(SvgWriteFailure::Propagate)
///     .build()
///     .unwrap();
/// assert_eq!(config.fallback_dpi, 150.0);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Resolution handed to the PDF writer when the source image carries no
    /// embedded DPI. Default: 300.
    pub fallback_dpi: f32,

    /// User password for encrypted PDF sources.
    pub password: Option<String>,

    /// Handling of unregistered format names. Default: fall back to JPEG.
    pub unknown_format: UnknownFormatPolicy,

    /// Handling of SVG write failures. Default: log and continue.
    pub svg_write_failure: SvgWriteFailure,

    /// Files converted at once by the batch drivers. Default: 1 (sequential).
    ///
    /// The engine itself is stateless across calls; this only controls how
    /// many `convert` calls the drivers keep in flight.
    pub concurrency: usize,

    /// Batch progress hook.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            fallback_dpi: 300.0,
            password: None,
            unknown_format: UnknownFormatPolicy::default(),
            svg_write_failure: SvgWriteFailure::default(),
            concurrency: 1,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("fallback_dpi", &self.fallback_dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("unknown_format", &self.unknown_format)
            .field("svg_write_failure", &self.svg_write_failure)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn fallback_dpi(mut self, dpi: f32) -> Self {
        self.config.fallback_dpi = dpi;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn unknown_format(mut self, policy: UnknownFormatPolicy) -> Self {
        self.config.unknown_format = policy;
        self
    }

    pub fn svg_write_failure(mut self, policy: SvgWriteFailure) -> Self {
        self.config.svg_write_failure = policy;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if !(c.fallback_dpi.is_finite() && c.fallback_dpi > 0.0) {
            return Err(ConvertError::InvalidConfig(format!(
                "Fallback DPI must be a positive number, got {}",
                c.fallback_dpi
            )));
        }
        if c.concurrency == 0 {
            return Err(ConvertError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
