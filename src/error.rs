//! Error types for the logiWIN control core.

/// Errors that can occur while configuring the logiWIN core.
///
/// All of these are local and non-fatal: the operation that produced one has
/// performed no register write and left the in-memory state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Scale steps cannot be computed from a zero-sized rectangle.
    #[error("cannot scale with a zero-sized rectangle (crop {crop:?}, out {out:?})")]
    InvalidGeometry {
        /// Crop rectangle width and height.
        crop: (u32, u32),
        /// Output rectangle width and height.
        out: (u32, u32),
    },

    /// A stencil mask write would fall outside the BRAM window.
    #[error("stencil mask write outside the BRAM window (offset {offset}, length {length})")]
    StencilOutOfRange {
        /// Requested offset in mask words.
        offset: u32,
        /// Requested length in mask words.
        length: u32,
    },

    /// A stencil mask offset or length was not even.
    #[error("stencil mask offset {offset} and length {length} must both be even")]
    StencilUnaligned {
        /// Requested offset in mask words.
        offset: u32,
        /// Requested length in mask words.
        length: u32,
    },

    /// The resolution register reported a value the core cannot capture.
    #[error("resolution readback out of range ({hres}x{vres})")]
    ResolutionOutOfRange {
        /// Horizontal resolution read back from the hardware.
        hres: u32,
        /// Vertical resolution read back from the hardware.
        vres: u32,
    },

    /// A configured resolution was zero or above the hardware maximum.
    #[error("invalid resolution {width}x{height}")]
    InvalidResolution {
        /// Configured width in pixels.
        width: u32,
        /// Configured height in lines.
        height: u32,
    },

    /// The configured output alignment was not a power of two.
    #[error("output alignment {0} is not a power of two")]
    InvalidAlignment(u32),

    /// The configured scale fraction bit count does not fit the registers.
    #[error("scale fraction bits {0} out of range (0-16)")]
    InvalidFractionBits(u32),
}
