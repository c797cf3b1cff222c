//! Fixed-point scale step arithmetic.
//!
//! Scale steps are input-pixels-per-output-pixel ratios in a 16-bit fraction
//! fixed-point format ([`SCALE_STEP`](crate::regs::SCALE_STEP) is 1.0). Only
//! the top `16 - scale_shift` fraction bits are hardware-significant; the
//! low `scale_shift` bits are masked off before a step is committed and
//! shifted out before a register write.

use crate::regs::{SCALE_FRAC_MASK, SCALE_STEP, SCALE_STEP_MAX};

/// Mask a step to the hardware-significant fraction bits and clamp it into
/// the representable range `[1 << scale_shift, SCALE_STEP_MAX]`.
pub fn clamp_step(step: u32, scale_shift: u32) -> u32 {
    let step_min = 1 << scale_shift;
    let prec_mask = !0u32 << scale_shift;

    let step = step & prec_mask;
    if step < step_min {
        step_min
    } else if step > SCALE_STEP_MAX {
        SCALE_STEP_MAX
    } else {
        step
    }
}

/// Interpolation start offset for a scale step.
///
/// Upscaling (step at or below 1.0) starts at phase 0. Exact integer
/// downscale ratios start half a unit in, centering the first tap. Any
/// other downscale starts at half the fractional remainder. The three
/// cases are distinct on the hardware; collapsing them into one formula
/// shifts the image by sub-pixel amounts at certain ratios.
pub fn start_offset(step: u32) -> u32 {
    if step <= SCALE_STEP {
        0
    } else if step & SCALE_FRAC_MASK == 0 {
        SCALE_STEP >> 1
    } else {
        (step & SCALE_FRAC_MASK) / 2
    }
}
