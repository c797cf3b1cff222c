//! Register-level control core for the Xylon logiWIN scaler/overlay
//! ("frame grabber window") FPGA IP.
//!
//! The crate models the control and geometry engine of the core: rectangle
//! clipping and output positioning, fixed-point scale step computation,
//! control register sequencing (including the timed quiesce required by
//! some feature toggles), tonal adjustment encodings and interrupt mask
//! management. The actual pixel processing happens in hardware once the
//! registers are written; a driver shell on top of this crate handles
//! buffers, interrupts and the user-facing device surface.
//!
//! All hardware access goes through the [`RegisterBus`] trait. [`MmioBus`]
//! drives a memory-mapped register window; [`MockBus`] emulates one in
//! memory, which together with the hardware access gate makes the whole
//! core testable without a device.
//!
//! # Example
//!
//! ```
//! use logiwin::{FrameGrabber, GrabberConfig, MockBus, Rect, RectKind};
//!
//! let config = GrabberConfig::default();
//! let mut grabber = FrameGrabber::new(MockBus::new(), &config)?;
//! grabber.set_hw_access(true);
//!
//! // Capture the center of the input frame into a 640x480 window.
//! grabber.set_rect(RectKind::Crop, Rect::new(320, 180, 1280, 720));
//! grabber.set_rect(RectKind::Out, Rect::new(0, 0, 640, 480));
//! grabber.set_scale()?;
//! grabber.update_registers();
//!
//! grabber.set_brightness(10);
//! grabber.start();
//! # Ok::<(), logiwin::Error>(())
//! ```
//!
//! # Concurrency
//!
//! The core is a synchronous state manipulator with no internal locking;
//! at most one configuration sequence may be in flight at a time. The
//! quiesce sequences busy-wait the calling thread for a few microseconds,
//! so keep them off latency-sensitive paths.

#![warn(missing_docs)]

mod bus;
mod config;
mod error;
mod geometry;
mod grabber;
mod mock;
pub mod regs;
mod scale;
mod tonal;

// Re-export public API
pub use bus::{MmioBus, RegisterBus};
pub use config::{GrabberConfig, PixelFormat, VideoInput};
pub use error::Error;
pub use geometry::{position_output, OutputCoords, Rect, RectKind};
pub use grabber::{FrameGrabber, FrameRate, Operation};
pub use mock::MockBus;

#[cfg(test)]
mod tests {
    use super::*;

    fn grabber_with(config: GrabberConfig) -> FrameGrabber<MockBus> {
        let mut grabber = FrameGrabber::new(MockBus::new(), &config).unwrap();
        grabber.set_hw_access(true);
        grabber.bus_mut().clear_journal();
        grabber
    }

    fn default_grabber() -> FrameGrabber<MockBus> {
        grabber_with(GrabberConfig::default())
    }

    #[test]
    fn hd_to_vga_scale_scenario() {
        let mut grabber = default_grabber();

        grabber.set_rect(RectKind::Out, Rect::new(0, 0, 640, 480));
        grabber.set_scale().unwrap();

        assert_eq!(grabber.scale_steps(), (196608, 147456));
        // Both steps are exact multiples of the base unit, so the start
        // offsets land on the half-unit center.
        assert_eq!(grabber.start_offsets(), (32768, 32768));

        grabber.update_registers();
        let bus = grabber.bus();
        assert_eq!(bus.last_write(regs::SCALE_X), Some(192));
        assert_eq!(bus.last_write(regs::SCALE_Y), Some(144));
        assert_eq!(bus.last_write(regs::START_X), Some(32));
        assert_eq!(bus.last_write(regs::START_Y), Some(32));
        // Down-right coordinates use the inclusive minus-one convention.
        assert_eq!(bus.last_write(regs::DR_X), Some(639));
        assert_eq!(bus.last_write(regs::DR_Y), Some(479));
        assert_eq!(bus.last_write(regs::UL_X), Some(0));
        assert_eq!(bus.last_write(regs::CROP_X), Some(0));
    }

    #[test]
    fn scale_pipeline_is_idempotent() {
        let mut grabber = default_grabber();
        grabber.set_rect(RectKind::Crop, Rect::new(12, 34, 1234, 570));
        grabber.set_rect(RectKind::Out, Rect::new(10, 20, 700, 500));

        grabber.set_scale().unwrap();
        let first = (grabber.scale_steps(), grabber.start_offsets());
        grabber.set_scale().unwrap();
        let second = (grabber.scale_steps(), grabber.start_offsets());

        assert_eq!(first, second);
    }

    #[test]
    fn scale_steps_stay_in_range() {
        let mut grabber = default_grabber();
        let min = 1 << 10;
        let max = (1 << 20) - 1;

        for (sx, sy) in [(0, 0), (1, max), (u32::MAX, u32::MAX), (min, min)] {
            grabber.set_scale_steps(sx, sy);
            let (hstep, vstep) = grabber.scale_steps();
            assert!((min..=max).contains(&hstep), "hstep {:#x}", hstep);
            assert!((min..=max).contains(&vstep), "vstep {:#x}", vstep);
        }
    }

    #[test]
    fn zero_sized_rectangles_fail_scale() {
        let mut grabber = default_grabber();
        grabber.set_rect(RectKind::Crop, Rect::new(0, 0, 0, 1080));

        let err = grabber.set_scale().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidGeometry {
                crop: (0, 1080),
                out: (1024, 768),
            }
        );
        // Failure leaves the previous scale state and registers untouched.
        assert_eq!(grabber.scale_steps(), (65536, 65536));
        assert!(grabber.bus().writes().is_empty());
    }

    #[test]
    fn quiesced_toggle_delays_once_and_restores_enable() {
        let mut grabber = default_grabber();
        grabber.set_operation(Operation::Enable, true);
        grabber.bus_mut().clear_journal();

        grabber.set_operation(Operation::Swizzle, true);

        let expected = regs::CTRL_ENABLE | regs::CTRL_SWIZZLE;
        assert_eq!(grabber.control_word(), expected);
        let bus = grabber.bus();
        assert_eq!(bus.delay_count(), 1);
        assert_eq!(bus.total_delay_us(), 10);
        // First write stalls the pipeline with the new bit already in
        // place, the final write restores enable.
        assert_eq!(
            bus.writes_to(regs::CTRL0),
            vec![regs::CTRL_SWIZZLE, expected]
        );
        assert_eq!(bus.reg(regs::CTRL0), grabber.control_word());
    }

    #[test]
    fn quiesce_skipped_while_disabled() {
        let mut grabber = default_grabber();

        grabber.set_operation(Operation::FrameStoreStop, true);

        assert_eq!(grabber.bus().delay_count(), 0);
        assert_eq!(
            grabber.bus().writes_to(regs::CTRL0),
            vec![regs::CTRL_FRAME_STORE_STOP]
        );
    }

    #[test]
    fn plain_toggle_never_delays() {
        let mut grabber = default_grabber();
        grabber.set_operation(Operation::Enable, true);

        grabber.set_operation(Operation::StencilMask, true);
        grabber.set_operation(Operation::CpuBufferSwitch, true);
        grabber.set_operation(Operation::EvenFieldBufferSwitch, false);

        assert_eq!(grabber.bus().delay_count(), 0);
    }

    #[test]
    fn interrupt_enable_clears_mask_bits() {
        let mut grabber = default_grabber();
        assert_eq!(grabber.interrupt_mask(), 0xFFFF);

        grabber.set_interrupt_enabled(regs::INT_RESOLUTION, true);
        assert_eq!(grabber.interrupt_mask(), 0xFFFF & !regs::INT_RESOLUTION);
        assert_eq!(
            grabber.bus().last_write(regs::INT_MASK),
            Some(0xFFFF & !regs::INT_RESOLUTION)
        );

        grabber.set_interrupt_enabled(regs::INT_RESOLUTION, false);
        assert_eq!(grabber.interrupt_mask(), 0xFFFF);
    }

    #[test]
    fn status_clear_with_zero_mask_clears_all() {
        let mut grabber = default_grabber();

        grabber.clear_interrupt_status(0);
        assert_eq!(grabber.bus().last_write(regs::INT_STAT), Some(!0));

        grabber.clear_interrupt_status(regs::INT_FRAME_START);
        assert_eq!(
            grabber.bus().last_write(regs::INT_STAT),
            Some(regs::INT_FRAME_START)
        );
    }

    #[test]
    fn stencil_write_rejected_at_window_edge() {
        let mut grabber = default_grabber();

        let err = grabber.write_stencil_mask(&[0; 4], 2046).unwrap_err();
        assert_eq!(
            err,
            Error::StencilOutOfRange {
                offset: 2046,
                length: 4,
            }
        );
        assert!(grabber.bus().writes().is_empty(), "no partial write");

        let err = grabber.write_stencil_mask(&[0; 3], 0).unwrap_err();
        assert_eq!(
            err,
            Error::StencilUnaligned {
                offset: 0,
                length: 3,
            }
        );
        assert!(grabber.bus().writes().is_empty());
    }

    #[test]
    fn stencil_write_doubles_register_stride() {
        let mut grabber = default_grabber();

        grabber.write_stencil_mask(&[0xAAAA, 0x5555], 4).unwrap();

        let base = regs::MASK_BRAM_OFFSET + 4 * 2;
        assert_eq!(
            grabber.bus().writes(),
            &[(base, 0xAAAA), (base + 4, 0x5555)]
        );
    }

    #[test]
    fn frame_rate_change_clears_upper_control_bits() {
        let mut grabber = default_grabber();
        grabber.set_sync_polarity(0, true, true);
        assert_eq!(
            grabber.control_word(),
            regs::HSYNC_INVERT_CH_0 | regs::VSYNC_INVERT_CH_0
        );

        // Known hardware-compatibility quirk: the rate field assembly
        // wipes every control bit above the low byte's rate-free region,
        // sync polarity inversion included.
        grabber.set_frame_rate(FrameRate::Half);
        assert_eq!(grabber.control_word(), regs::FRAME_RATE_MASK_50);

        grabber.set_frame_rate(FrameRate::Full);
        assert_eq!(grabber.control_word(), 0);
    }

    #[test]
    fn frame_rate_keeps_low_byte_features() {
        let mut grabber = default_grabber();
        grabber.set_operation(Operation::Enable, true);
        grabber.set_operation(Operation::StencilMask, true);

        grabber.set_frame_rate(FrameRate::Quarter);

        assert_eq!(
            grabber.control_word(),
            regs::CTRL_ENABLE | regs::CTRL_STENCIL_MASK | regs::FRAME_RATE_MASK_25
        );
    }

    #[test]
    fn out_of_range_channel_is_ignored() {
        let mut grabber = default_grabber();

        assert_eq!(grabber.select_channel(1), 1);
        assert_eq!(grabber.control_word(), regs::CTRL_INPUT_SELECT);
        grabber.bus_mut().clear_journal();

        assert_eq!(grabber.select_channel(2), 1);
        assert_eq!(grabber.channel(), 1);
        assert!(grabber.bus().writes().is_empty());

        assert_eq!(grabber.select_channel(0), 0);
        assert_eq!(grabber.control_word(), 0);
    }

    #[test]
    fn out_of_range_sync_channel_is_ignored() {
        let mut grabber = default_grabber();

        grabber.set_sync_polarity(7, true, true);

        assert_eq!(grabber.control_word(), 0);
        assert!(grabber.bus().writes().is_empty());
    }

    #[test]
    fn weave_deinterlace_round_trip() {
        let mut config = GrabberConfig::default();
        config.input = VideoInput::Itu;
        let mut grabber = grabber_with(config);

        grabber.set_rect(RectKind::Out, Rect::new(0, 100, 640, 480));
        grabber.set_scale().unwrap();
        let bob_steps = grabber.scale_steps();

        grabber.set_weave_deinterlace(true);
        assert!(grabber.weave_deinterlace());
        assert_ne!(grabber.control_word() & regs::CTRL_WEAVE_DEINTERLACE, 0);
        // The getter reports the vertical step per output line, so it is
        // unchanged even though the committed step doubled.
        assert_eq!(grabber.scale_steps(), bob_steps);

        grabber.set_weave_deinterlace(false);
        assert!(!grabber.weave_deinterlace());
        assert_eq!(grabber.scale_steps(), bob_steps);
        assert_eq!(grabber.rect(RectKind::Out), Rect::new(0, 100, 640, 480));
    }

    #[test]
    fn weave_deinterlace_quiesces_running_pipeline() {
        let mut config = GrabberConfig::default();
        config.input = VideoInput::Itu;
        let mut grabber = grabber_with(config);
        grabber.set_operation(Operation::Enable, true);
        grabber.bus_mut().clear_journal();

        grabber.set_weave_deinterlace(true);

        assert_eq!(grabber.bus().delay_count(), 1);
        assert_ne!(grabber.control_word() & regs::CTRL_ENABLE, 0);
        assert_eq!(grabber.bus().reg(regs::CTRL0), grabber.control_word());
    }

    #[test]
    fn weave_deinterlace_requires_itu_input() {
        let mut grabber = default_grabber();

        grabber.set_weave_deinterlace(true);

        assert!(!grabber.weave_deinterlace());
        assert_eq!(grabber.control_word(), 0);
        assert!(grabber.bus().writes().is_empty());
    }

    #[test]
    fn closed_gate_drops_all_register_traffic() {
        let mut grabber = FrameGrabber::new(MockBus::new(), &GrabberConfig::default()).unwrap();
        grabber.bus_mut().set_reg(regs::INT_STAT, 0x3);

        grabber.set_brightness(25);
        grabber.set_operation(Operation::Enable, true);
        grabber.update_registers();
        assert_eq!(grabber.interrupt_status(), 0);
        assert!(grabber.bus().writes().is_empty());

        // The mirrors keep tracking so the state is pushed once the gate
        // opens.
        assert_eq!(grabber.control_word(), regs::CTRL_ENABLE);
        grabber.set_hw_access(true);
        assert_eq!(grabber.interrupt_status(), 0x3);
    }

    #[test]
    fn resolution_change_rederives_geometry() {
        let mut grabber = default_grabber();
        grabber
            .bus_mut()
            .set_reg(regs::RESOLUTION, (720 << 16) | 1280);

        let (hres, vres) = grabber.handle_resolution_change().unwrap();

        assert_eq!((hres, vres), (1280, 720));
        assert_eq!(grabber.rect(RectKind::Bounds), Rect::new(0, 0, 1280, 720));
        assert_eq!(grabber.rect(RectKind::Crop), Rect::new(0, 0, 1280, 720));
        assert_eq!(grabber.scale_steps(), (65536 * 1280 / 1024, 65536 * 720 / 768));
    }

    #[test]
    fn resolution_change_rejects_bad_readback() {
        let mut grabber = default_grabber();
        grabber.bus_mut().set_reg(regs::RESOLUTION, 4096);

        let err = grabber.handle_resolution_change().unwrap_err();

        assert_eq!(err, Error::ResolutionOutOfRange { hres: 4096, vres: 0 });
        assert_eq!(grabber.rect(RectKind::Bounds), Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn start_arms_interrupts_and_enables() {
        let mut grabber = default_grabber();

        grabber.start();

        assert_eq!(grabber.bus().last_write(regs::INT_STAT), Some(!0));
        assert_eq!(grabber.interrupt_mask(), 0xFFFF & !regs::INT_ALL);
        assert_ne!(grabber.control_word() & regs::CTRL_ENABLE, 0);

        grabber.stop();
        assert_eq!(grabber.control_word() & regs::CTRL_ENABLE, 0);
        assert_eq!(grabber.interrupt_mask(), 0xFFFF);
    }

    #[test]
    fn hw_buffer_switch_leaves_frame_start_masked() {
        let mut config = GrabberConfig::default();
        config.hw_buffer_switch = true;
        let mut grabber = grabber_with(config);

        grabber.start();

        assert_eq!(grabber.interrupt_mask(), 0xFFFF & !regs::INT_RESOLUTION);
    }

    #[test]
    fn unaligned_rectangles_are_masked_down() {
        let mut config = GrabberConfig::default();
        config.out_align = 4;
        let mut grabber = grabber_with(config);

        grabber.set_rect(RectKind::Crop, Rect::new(5, 7, 10, 9));
        assert_eq!(grabber.rect(RectKind::Crop), Rect::new(4, 7, 8, 9));

        // Already aligned values pass through unchanged.
        grabber.set_rect(RectKind::Crop, Rect::new(8, 7, 12, 9));
        assert_eq!(grabber.rect(RectKind::Crop), Rect::new(8, 7, 12, 9));
    }

    #[test]
    fn bounds_are_clipped_to_the_input_frame() {
        let mut grabber = default_grabber();

        grabber.set_rect(RectKind::Bounds, Rect::new(1900, 1000, 400, 400));

        assert_eq!(
            grabber.rect(RectKind::Bounds),
            Rect::new(1900, 1000, 20, 80)
        );
    }

    #[test]
    fn tonal_setters_write_their_registers() {
        let mut grabber = default_grabber();

        grabber.set_brightness(50);
        grabber.set_contrast(-50);
        grabber.set_saturation(0);
        grabber.set_hue(-30);
        grabber.set_pixel_alpha(0x180);

        let bus = grabber.bus();
        assert_eq!(bus.last_write(regs::BRIGHTNESS), Some(63));
        assert_eq!(bus.last_write(regs::CONTRAST), Some(0));
        assert_eq!(bus.last_write(regs::SATURATION), Some(2039));
        assert_eq!(bus.last_write(regs::COS_HUE), Some(1773));
        assert_eq!(bus.last_write(regs::SIN_HUE), Some(1024u32.wrapping_neg()));
        // Alpha is written as given; the mirror truncates to 8 bits.
        assert_eq!(bus.last_write(regs::PIX_ALPHA), Some(0x180));
    }

    #[test]
    fn out_rectangle_snap_reaches_the_registers() {
        let mut grabber = default_grabber();

        grabber.set_rect(RectKind::Out, Rect::new(2000, 0, 640, 480));
        grabber.update_registers();

        let bus = grabber.bus();
        assert_eq!(bus.last_write(regs::UL_X), Some(0));
        assert_eq!(bus.last_write(regs::DR_X), Some(1023));
    }
}
