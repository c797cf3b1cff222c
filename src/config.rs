//! Static configuration of a logiWIN instance.
//!
//! These values come from the platform description of the synthesized core
//! (device tree or equivalent) and are fixed for the lifetime of an
//! instance.

use crate::error::Error;
use crate::regs::{MAX_IN_HRES, MAX_IN_VRES, MAX_OUT_HRES, MAX_OUT_VRES};

/// Video input interface of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoInput {
    /// DVI input.
    Dvi,
    /// ITU-656 input (the only input that supports weave deinterlacing).
    Itu,
    /// Analog RGB input.
    Rgb,
}

/// Pixel format the core stores to video memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 5:6:5 packed RGB.
    Rgb565,
    /// 8:8:8:8 packed ARGB.
    Argb8888,
    /// 4:2:2 packed YUYV.
    Yuyv,
}

impl PixelFormat {
    /// Bits per stored pixel.
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgb565 | PixelFormat::Yuyv => 16,
            PixelFormat::Argb8888 => 32,
        }
    }
}

/// Configuration of one logiWIN hardware instance.
#[derive(Debug, Clone)]
pub struct GrabberConfig {
    /// Input resolution in pixels and lines.
    pub input_resolution: (u32, u32),
    /// Output (display surface) resolution in pixels and lines.
    pub output_resolution: (u32, u32),
    /// Video input interface.
    pub input: VideoInput,
    /// Output pixel format.
    pub output_format: PixelFormat,
    /// Output byte alignment; upper-left X and width are kept multiples of
    /// this. Must be a power of two.
    pub out_align: u32,
    /// Number of hardware-significant fraction bits of the scale steps
    /// (6 for the usual 4.6 format). At most 16.
    pub scale_fraction_bits: u32,
    /// Whether the core switches video buffers on its own; when it does,
    /// the frame-start interrupt is left masked during capture.
    pub hw_buffer_switch: bool,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            input_resolution: (1920, 1080),
            output_resolution: (1024, 768),
            input: VideoInput::Dvi,
            output_format: PixelFormat::Argb8888,
            out_align: 2,
            scale_fraction_bits: 6,
            hw_buffer_switch: false,
        }
    }
}

impl GrabberConfig {
    /// Check the configuration against the hardware limits.
    pub fn validate(&self) -> Result<(), Error> {
        let (w, h) = self.input_resolution;
        if w == 0 || h == 0 || w > MAX_IN_HRES || h > MAX_IN_VRES {
            return Err(Error::InvalidResolution {
                width: w,
                height: h,
            });
        }
        let (w, h) = self.output_resolution;
        if w == 0 || h == 0 || w > MAX_OUT_HRES || h > MAX_OUT_VRES {
            return Err(Error::InvalidResolution {
                width: w,
                height: h,
            });
        }
        if self.out_align == 0 || !self.out_align.is_power_of_two() {
            return Err(Error::InvalidAlignment(self.out_align));
        }
        if self.scale_fraction_bits > 16 {
            return Err(Error::InvalidFractionBits(self.scale_fraction_bits));
        }
        Ok(())
    }
}
