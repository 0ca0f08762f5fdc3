//! Error types for the registration pipeline.

use depth_types::DepthError;
use thiserror::Error;

/// Errors that can occur while registering depth or projecting clouds.
///
/// Nothing here is fatal to a host process: every variant maps to
/// "drop this frame and continue with the next synchronized tuple".
#[derive(Debug, Error)]
pub enum RegisterError {
    /// A camera record or image buffer was malformed.
    #[error(transparent)]
    Model(#[from] DepthError),

    /// The extrinsic lookup between two frames failed.
    #[error("pose lookup failed ({source_frame} -> {target_frame}): {reason}")]
    PoseLookup {
        /// Frame the points were to be mapped into.
        target_frame: String,
        /// Frame the points are expressed in.
        source_frame: String,
        /// Resolver-specific failure description.
        reason: String,
    },

    /// A companion image does not match the depth resolution.
    #[error("resolution mismatch: depth {depth_width}x{depth_height}, companion {other_width}x{other_height}")]
    ResolutionMismatch {
        /// Depth frame width.
        depth_width: u32,
        /// Depth frame height.
        depth_height: u32,
        /// Companion frame width.
        other_width: u32,
        /// Companion frame height.
        other_height: u32,
    },
}

impl RegisterError {
    /// Creates a pose lookup error.
    #[must_use]
    pub fn pose_lookup(
        target_frame: impl Into<String>,
        source_frame: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::PoseLookup {
            target_frame: target_frame.into(),
            source_frame: source_frame.into(),
            reason: reason.into(),
        }
    }

    /// Creates a resolution mismatch error.
    #[must_use]
    pub const fn resolution_mismatch(
        depth_width: u32,
        depth_height: u32,
        other_width: u32,
        other_height: u32,
    ) -> Self {
        Self::ResolutionMismatch {
            depth_width,
            depth_height,
            other_width,
            other_height,
        }
    }
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegisterError>;
