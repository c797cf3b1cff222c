//! Tonal adjustment register encoders.
//!
//! Brightness, contrast and saturation take percent-style values in
//! `[-50, 50]`; hue takes degrees in `[-30, 30]`. Out-of-range inputs are
//! clamped, never rejected. The hue tables are calibrated hardware
//! constants in a 2048-denominator fixed-point format and must not be
//! re-derived from floating-point trigonometry.

/// Cosine coefficients for hue angles 0 to 30 degrees.
const COS_TABLE: [u32; 31] = [
    2048, 2047, 2046, 2045, 2043, 2040, 2036, 2032, 2028, 2022, 2016, 2010, 2003, 1995, 1987,
    1978, 1968, 1958, 1947, 1936, 1924, 1911, 1898, 1885, 1870, 1856, 1840, 1824, 1808, 1791,
    1773,
];

/// Sine coefficients for hue angles 0 to 30 degrees.
const SIN_TABLE: [u32; 31] = [
    0, 35, 71, 107, 142, 178, 214, 249, 285, 320, 355, 390, 425, 460, 495, 530, 564, 598, 632,
    666, 700, 733, 767, 800, 832, 865, 897, 929, 961, 992, 1024,
];

/// Encode a brightness value into its register code.
///
/// The code is centered at 32 and spans 0 (brightness -50) to 63
/// (brightness 50).
pub fn encode_brightness(brightness: i32) -> u32 {
    let brightness = brightness.clamp(-50, 50);
    (32 + (63 * brightness).div_euclid(100)) as u32
}

/// Encode a contrast or saturation value into its register coefficient.
///
/// Both share the same 2048-denominator encoding; the product is carried in
/// 64 bits before the final division.
pub fn encode_contrast_saturation(value: i32) -> u32 {
    let value = i64::from(value.clamp(-50, 50));
    (1992 * (value + 50) * 2048 / 100_000) as u32
}

/// Encode a hue angle into its `(cosine, sine)` register pair.
///
/// Negative angles reuse the positive-angle table entries with the sine
/// negated in full-register two's complement, which is how the hardware
/// expects it.
pub fn encode_hue(hue: i32) -> (u32, u32) {
    let hue = hue.clamp(-30, 30);
    let idx = hue.unsigned_abs() as usize;

    let reg_cos = COS_TABLE[idx];
    let reg_sin = if hue < 0 {
        SIN_TABLE[idx].wrapping_neg()
    } else {
        SIN_TABLE[idx]
    };

    (reg_cos, reg_sin)
}
