//! logiWIN register map and bit-level constants.
//!
//! Every logical register occupies one slot of [`REG_STRIDE`] bytes in the
//! memory-mapped window. The stencil mask BRAM sits behind the ordinary
//! registers at [`MASK_BRAM_OFFSET`].

/// Byte stride between consecutive logical registers.
pub const REG_STRIDE: u32 = 8;

/// Down-right X coordinate of the output window (written as `value - 1`).
pub const DR_X: u32 = 0 * REG_STRIDE;
/// Down-right Y coordinate of the output window (written as `value - 1`).
pub const DR_Y: u32 = 1 * REG_STRIDE;
/// Upper-left X coordinate of the output window.
pub const UL_X: u32 = 2 * REG_STRIDE;
/// Upper-left Y coordinate of the output window.
pub const UL_Y: u32 = 3 * REG_STRIDE;
/// Horizontal scale step.
pub const SCALE_X: u32 = 4 * REG_STRIDE;
/// Vertical scale step.
pub const SCALE_Y: u32 = 5 * REG_STRIDE;
/// Control register.
pub const CTRL0: u32 = 6 * REG_STRIDE;
/// Horizontal interpolation start offset.
pub const START_X: u32 = 7 * REG_STRIDE;
/// Vertical interpolation start offset.
pub const START_Y: u32 = 8 * REG_STRIDE;
/// Crop origin X.
pub const CROP_X: u32 = 9 * REG_STRIDE;
/// Crop origin Y.
pub const CROP_Y: u32 = 10 * REG_STRIDE;
/// Even field video memory pointer.
pub const MEM_OFFSET_EVEN: u32 = 11 * REG_STRIDE;
/// Odd field video memory pointer.
pub const MEM_OFFSET_ODD: u32 = 12 * REG_STRIDE;
/// Global pixel alpha.
pub const PIX_ALPHA: u32 = 13 * REG_STRIDE;
/// Contrast coefficient.
pub const CONTRAST: u32 = 15 * REG_STRIDE;
/// Saturation coefficient.
pub const SATURATION: u32 = 16 * REG_STRIDE;
/// Brightness code.
pub const BRIGHTNESS: u32 = 17 * REG_STRIDE;
/// Hue cosine coefficient.
pub const COS_HUE: u32 = 18 * REG_STRIDE;
/// Hue sine coefficient.
pub const SIN_HUE: u32 = 19 * REG_STRIDE;
/// CPU video buffer switch trigger.
pub const VBUFF_SWITCH: u32 = 20 * REG_STRIDE;
/// Interrupt status register.
pub const INT_STAT: u32 = 22 * REG_STRIDE;
/// Interrupt mask register (bit set = interrupt masked off).
pub const INT_MASK: u32 = 23 * REG_STRIDE;
/// IP core version.
pub const IP_VER: u32 = 24 * REG_STRIDE;
/// Input resolution readback (hres in low 16 bits, vres in high 16 bits).
pub const RESOLUTION: u32 = 25 * REG_STRIDE;

/// Base byte offset of the stencil mask BRAM window.
pub const MASK_BRAM_OFFSET: u32 = 0x200 * REG_STRIDE;

/// Control register bits.
pub const CTRL_ENABLE: u32 = 1 << 0;
/// Switch video buffers on even fields only.
pub const CTRL_EVEN_FIELD_VBUFF_SWITCH: u32 = 1 << 2;
/// Weave deinterlace (bob when clear).
pub const CTRL_WEAVE_DEINTERLACE: u32 = 1 << 3;
/// Input channel select (channel 1 when set).
pub const CTRL_INPUT_SELECT: u32 = 1 << 4;
/// Stencil mask enable.
pub const CTRL_STENCIL_MASK: u32 = 1 << 5;
/// CPU controlled video buffer switching.
pub const CTRL_CPU_VBUFF_SWITCH: u32 = 1 << 8;
/// Stop after storing one frame.
pub const CTRL_FRAME_STORE_STOP: u32 = 1 << 9;
/// Byte swizzle of the output pixels.
pub const CTRL_SWIZZLE: u32 = 1 << 11;

/// Frame rate field: keeps only the non-rate control bits when used as an
/// AND mask; the rate patterns below are OR-ed on top of it.
pub const FRAME_RATE_MASK_FULL: u32 = 0x3F;
/// 75% frame rate pattern.
pub const FRAME_RATE_MASK_75: u32 = 0x40;
/// 50% frame rate pattern.
pub const FRAME_RATE_MASK_50: u32 = 0x80;
/// 25% frame rate pattern.
pub const FRAME_RATE_MASK_25: u32 = 0xC0;

/// Channel 0 horizontal sync polarity invert.
pub const HSYNC_INVERT_CH_0: u32 = 0x1000;
/// Channel 0 vertical sync polarity invert.
pub const VSYNC_INVERT_CH_0: u32 = 0x2000;
/// Channel 1 horizontal sync polarity invert.
pub const HSYNC_INVERT_CH_1: u32 = 0x4000;
/// Channel 1 vertical sync polarity invert.
pub const VSYNC_INVERT_CH_1: u32 = 0x8000;

/// Frame start interrupt.
pub const INT_FRAME_START: u32 = 0x1;
/// Input resolution change interrupt.
pub const INT_RESOLUTION: u32 = 0x2;
/// All known interrupt bits.
pub const INT_ALL: u32 = INT_FRAME_START | INT_RESOLUTION;

/// Fixed-point base unit of the scale steps (1.0 in 16-bit fraction format).
pub const SCALE_STEP: u32 = 1 << 16;
/// Largest scale step the hardware register can hold.
pub const SCALE_STEP_MAX: u32 = (1 << 20) - 1;
/// Mask selecting the fractional part of a scale step.
pub const SCALE_FRAC_MASK: u32 = SCALE_STEP - 1;

/// Maximum video memory stride in mask words (bounds the stencil BRAM).
pub const MAX_VMEM_STRIDE: u32 = 2048;
/// Maximum input horizontal resolution.
pub const MAX_IN_HRES: u32 = 2048;
/// Maximum input vertical resolution.
pub const MAX_IN_VRES: u32 = 2048;
/// Maximum output horizontal resolution.
pub const MAX_OUT_HRES: u32 = 2048;
/// Maximum output vertical resolution.
pub const MAX_OUT_VRES: u32 = 2048;

/// Settle time in microseconds before re-enabling the pipeline after a
/// quiesced control bit change.
pub const SETTLE_US: u32 = 10;
