//! The logiWIN frame grabber control core.
//!
//! [`FrameGrabber`] owns the full per-instance parameter block: the
//! geometry rectangles, the scale state, the control and interrupt mask
//! register mirrors and the tonal settings. Every mutating call is a
//! synchronous read-modify-write of the mirror plus, when hardware access
//! is enabled, the corresponding register write. The core performs no
//! locking; callers serialize configuration sequences themselves.

use log::{debug, info, trace};

use crate::bus::RegisterBus;
use crate::config::{GrabberConfig, VideoInput};
use crate::error::Error;
use crate::geometry::{position_output, OutputCoords, Rect, RectKind};
use crate::regs;
use crate::scale::{clamp_step, start_offset};
use crate::tonal;

/// Feature toggle of the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Master pipeline enable.
    Enable,
    /// Switch video buffers on even fields only.
    EvenFieldBufferSwitch,
    /// Stencil mask cut-out.
    StencilMask,
    /// CPU-driven video buffer switching.
    CpuBufferSwitch,
    /// Stop after one stored frame. Requires a quiesced pipeline.
    FrameStoreStop,
    /// Output byte swizzle. Requires a quiesced pipeline.
    Swizzle,
}

/// Fraction of input frames the core stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRate {
    /// Store every frame.
    Full,
    /// Store 75% of the frames.
    ThreeQuarters,
    /// Store 50% of the frames.
    Half,
    /// Store 25% of the frames.
    Quarter,
}

/// Control core of one logiWIN hardware instance.
///
/// Created per instance attach with hardware access disabled, so a caller
/// (or a test harness) can configure geometry and scale before any
/// register is touched. The in-memory control mirror and the hardware
/// control register are identical after every mutating call returns,
/// except inside the deliberate quiesce window of [`set_operation`]
/// (`FrameStoreStop`/`Swizzle`) and [`set_weave_deinterlace`].
///
/// [`set_operation`]: FrameGrabber::set_operation
/// [`set_weave_deinterlace`]: FrameGrabber::set_weave_deinterlace
pub struct FrameGrabber<B: RegisterBus> {
    bus: B,
    hw_access: bool,

    in_rect: Rect,
    bounds: Rect,
    crop: Rect,
    out: Rect,
    output: OutputCoords,
    out_hres: u32,
    out_vres: u32,
    out_align: u32,
    out_align_mask: u32,

    hscale_step: u32,
    vscale_step: u32,
    start_x: u32,
    start_y: u32,
    scale_shift: u32,

    ctrl: u32,
    int_mask: u32,
    channel_id: u8,
    weave_deinterlace: bool,
    input: VideoInput,
    hw_buffer_switch: bool,

    brightness: i32,
    contrast: i32,
    saturation: i32,
    hue: i32,
    alpha: u8,
}

impl<B: RegisterBus> FrameGrabber<B> {
    /// Create the control core for one hardware instance.
    ///
    /// Bounds and crop start at the full input frame, the output rectangle
    /// at the full display surface, and the scale steps at 1.0. Hardware
    /// access starts disabled; call [`set_hw_access`](Self::set_hw_access)
    /// once the register window is live.
    pub fn new(bus: B, config: &GrabberConfig) -> Result<Self, Error> {
        config.validate()?;

        let (in_hres, in_vres) = config.input_resolution;
        let (out_hres, out_vres) = config.output_resolution;

        let in_rect = Rect::new(0, 0, in_hres, in_vres);
        let mut out = Rect::new(0, 0, out_hres, out_vres);
        let mut output = OutputCoords::default();
        position_output(&mut out, out_hres, out_vres, &mut output);

        Ok(Self {
            bus,
            hw_access: false,
            in_rect,
            bounds: in_rect,
            crop: in_rect,
            out,
            output,
            out_hres,
            out_vres,
            out_align: config.out_align,
            out_align_mask: !(config.out_align - 1),
            hscale_step: regs::SCALE_STEP,
            vscale_step: regs::SCALE_STEP,
            start_x: 0,
            start_y: 0,
            scale_shift: 16 - config.scale_fraction_bits,
            ctrl: 0,
            int_mask: 0xFFFF,
            channel_id: 0,
            weave_deinterlace: false,
            input: config.input,
            hw_buffer_switch: config.hw_buffer_switch,
            brightness: 0,
            contrast: 0,
            saturation: 0,
            hue: 0,
            alpha: 0xFF,
        })
    }

    /// Borrow the underlying register bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the underlying register bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the core, returning the register bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    fn read32(&mut self, offset: u32) -> u32 {
        if self.hw_access {
            let value = self.bus.read32(offset);
            trace!("read32 {:#05x} -> {:#010x}", offset, value);
            value
        } else {
            0
        }
    }

    fn write32(&mut self, offset: u32, value: u32) {
        if self.hw_access {
            trace!("write32 {:#05x} <- {:#010x}", offset, value);
            self.bus.write32(offset, value);
        }
    }

    /// Open or close the hardware access gate.
    ///
    /// While the gate is closed, register reads return 0 and writes are
    /// dropped; the in-memory mirrors keep updating either way. Opening
    /// the gate pushes the stored pixel alpha, the first step of the
    /// hardware bring-up order (the remaining state reaches the hardware
    /// through [`update_registers`](Self::update_registers) and the
    /// individual setters).
    pub fn set_hw_access(&mut self, enable: bool) {
        self.hw_access = enable;
        info!("hardware access {}", if enable { "enabled" } else { "disabled" });
        if enable {
            let alpha = u32::from(self.alpha);
            self.write32(regs::PIX_ALPHA, alpha);
        }
    }

    /// Whether the hardware access gate is open.
    pub fn hw_access(&self) -> bool {
        self.hw_access
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Get a stored rectangle.
    ///
    /// In weave deinterlace mode the output rectangle's top and height are
    /// divided by two on the way out, mirroring the accessor behavior the
    /// register update path was written against.
    pub fn rect(&self, kind: RectKind) -> Rect {
        match kind {
            RectKind::Bounds => self.bounds,
            RectKind::Crop => self.crop,
            RectKind::Out => {
                let mut r = self.out;
                if self.weave_deinterlace {
                    r.top /= 2;
                    r.height /= 2;
                }
                r
            }
        }
    }

    /// Set a stored rectangle.
    ///
    /// `left` and `width` are masked down to the configured output
    /// alignment when not already aligned. `Bounds` is clipped against the
    /// input frame. `Crop` is stored as given; keeping it inside bounds is
    /// the caller's responsibility. `Out` is positioned against the
    /// display surface and, in weave mode, halved vertically to field
    /// lines. Scale steps are not recomputed here; call
    /// [`set_scale`](Self::set_scale) after a batch of geometry changes.
    pub fn set_rect(&mut self, kind: RectKind, rect: Rect) {
        let mut left = rect.left;
        let mut width = rect.width;
        if left % self.out_align != 0 {
            left &= self.out_align_mask;
        }
        if width % self.out_align != 0 {
            width &= self.out_align_mask;
        }
        let rect = Rect::new(left, rect.top, width, rect.height);

        match kind {
            RectKind::Bounds => {
                self.bounds = rect;
                self.bounds.clip_to(&self.in_rect);
            }
            RectKind::Crop => {
                self.crop = rect;
            }
            RectKind::Out => {
                self.out = rect;
                position_output(&mut self.out, self.out_hres, self.out_vres, &mut self.output);
                if self.weave_deinterlace {
                    self.out.top /= 2;
                    self.out.height /= 2;
                }
            }
        }
        debug!("set {:?} rectangle: {:?}", kind, self.rect(kind));
    }

    /// Current absolute output coordinates.
    pub fn output_coords(&self) -> OutputCoords {
        self.output
    }

    // =========================================================================
    // Scaling
    // =========================================================================

    /// Recompute the scale steps from the crop and output rectangles.
    ///
    /// Fails without touching any state when either rectangle has a zero
    /// dimension. In weave mode the vertical step is halved because the
    /// core reads two field lines per output line.
    pub fn set_scale(&mut self) -> Result<(), Error> {
        if self.crop.width == 0
            || self.crop.height == 0
            || self.out.width == 0
            || self.out.height == 0
        {
            return Err(Error::InvalidGeometry {
                crop: (self.crop.width, self.crop.height),
                out: (self.out.width, self.out.height),
            });
        }

        let hscale_step = regs::SCALE_STEP * self.crop.width / self.out.width;
        let mut vscale_step = regs::SCALE_STEP * self.crop.height / self.out.height;

        if self.weave_deinterlace {
            vscale_step /= 2;
        }

        self.set_scale_steps(hscale_step, vscale_step);

        Ok(())
    }

    /// Set the scale steps directly, bypassing the crop/out derivation.
    ///
    /// The steps are masked to the configured fraction precision and
    /// clamped to the representable range; the interpolation start offsets
    /// are always rederived afterwards.
    pub fn set_scale_steps(&mut self, scale_x: u32, scale_y: u32) {
        let scale_y = if self.weave_deinterlace {
            scale_y.wrapping_mul(2)
        } else {
            scale_y
        };

        self.hscale_step = clamp_step(scale_x, self.scale_shift);
        self.vscale_step = clamp_step(scale_y, self.scale_shift);

        self.start_x = start_offset(self.hscale_step);
        self.start_y = start_offset(self.vscale_step);

        debug!(
            "scale steps: h={:#x} v={:#x} start=({:#x}, {:#x})",
            self.hscale_step, self.vscale_step, self.start_x, self.start_y
        );
    }

    /// Current scale steps, with the vertical step reported per output
    /// line (halved in weave mode).
    pub fn scale_steps(&self) -> (u32, u32) {
        let mut vscale_step = self.vscale_step;
        if self.weave_deinterlace {
            vscale_step /= 2;
        }
        (self.hscale_step, vscale_step)
    }

    /// Current interpolation start offsets.
    pub fn start_offsets(&self) -> (u32, u32) {
        (self.start_x, self.start_y)
    }

    /// Push the geometry and scale state to the hardware.
    ///
    /// The down-right coordinates are written minus one (the hardware
    /// treats them as inclusive); scale steps and start offsets are
    /// shifted down to their register precision. Call after any batch of
    /// geometry or scale changes.
    pub fn update_registers(&mut self) {
        let output = self.output;
        self.write32(regs::DR_X, output.dr_x.wrapping_sub(1));
        self.write32(regs::DR_Y, output.dr_y.wrapping_sub(1));
        self.write32(regs::UL_X, output.ul_x);
        self.write32(regs::UL_Y, output.ul_y);
        self.write32(regs::SCALE_X, self.hscale_step >> self.scale_shift);
        self.write32(regs::SCALE_Y, self.vscale_step >> self.scale_shift);
        self.write32(regs::START_X, self.start_x >> self.scale_shift);
        self.write32(regs::START_Y, self.start_y >> self.scale_shift);
        let crop = self.crop;
        self.write32(regs::CROP_X, crop.left);
        self.write32(regs::CROP_Y, crop.top);
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Set or clear a control register feature bit.
    ///
    /// `FrameStoreStop` and `Swizzle` may only change state while the
    /// pipeline is stalled: when the enable bit is currently set, the
    /// enable bit is cleared and written, the settle time is waited out,
    /// and the enable bit is restored in the mirror before the final
    /// combined write. Skipping the settle delay would change the feature
    /// under a running pipeline and corrupt the frame in flight.
    pub fn set_operation(&mut self, op: Operation, enable: bool) {
        let (op_mask, settle_us) = match op {
            Operation::Enable => (regs::CTRL_ENABLE, 0),
            Operation::EvenFieldBufferSwitch => (regs::CTRL_EVEN_FIELD_VBUFF_SWITCH, 0),
            Operation::StencilMask => (regs::CTRL_STENCIL_MASK, 0),
            Operation::CpuBufferSwitch => (regs::CTRL_CPU_VBUFF_SWITCH, 0),
            Operation::FrameStoreStop => (regs::CTRL_FRAME_STORE_STOP, regs::SETTLE_US),
            Operation::Swizzle => (regs::CTRL_SWIZZLE, regs::SETTLE_US),
        };

        if enable {
            self.ctrl |= op_mask;
        } else {
            self.ctrl &= !op_mask;
        }

        if settle_us != 0 && self.ctrl & regs::CTRL_ENABLE != 0 {
            self.quiesce(settle_us);
        }
        let ctrl = self.ctrl;
        self.write32(regs::CTRL0, ctrl);

        debug!("operation {:?} {}: ctrl={:#06x}", op, enable, self.ctrl);
    }

    fn quiesce(&mut self, settle_us: u32) {
        self.ctrl &= !regs::CTRL_ENABLE;
        let ctrl = self.ctrl;
        self.write32(regs::CTRL0, ctrl);

        self.bus.delay_us(settle_us);

        self.ctrl |= regs::CTRL_ENABLE;
    }

    /// Switch between weave and bob deinterlacing.
    ///
    /// Only meaningful on the ITU input; for other inputs this is a silent
    /// no-op. Weave merges two fields into one frame, so the output
    /// rectangle's vertical extent is halved to field lines and the
    /// vertical scale step doubled; switching back restores both. The
    /// switch quiesces a running pipeline the same way as
    /// [`set_operation`](Self::set_operation). There is no same-state
    /// guard: calling this twice with the same flag applies the geometry
    /// adjustment twice.
    pub fn set_weave_deinterlace(&mut self, weave: bool) {
        if self.input != VideoInput::Itu {
            return;
        }

        if weave {
            self.ctrl |= regs::CTRL_WEAVE_DEINTERLACE;
            self.out.top /= 2;
            self.out.height /= 2;
            self.vscale_step *= 2;
        } else {
            self.ctrl &= !regs::CTRL_WEAVE_DEINTERLACE;
            self.out.top *= 2;
            self.out.height *= 2;
            self.vscale_step = (self.vscale_step / 2) & (!0u32 << self.scale_shift);
        }
        self.weave_deinterlace = weave;

        if self.ctrl & regs::CTRL_ENABLE != 0 {
            self.quiesce(regs::SETTLE_US);
        }
        let ctrl = self.ctrl;
        self.write32(regs::CTRL0, ctrl);

        info!("deinterlace mode: {}", if weave { "weave" } else { "bob" });
    }

    /// Whether weave deinterlacing is active.
    pub fn weave_deinterlace(&self) -> bool {
        self.weave_deinterlace
    }

    /// Select the input video channel (0 or 1).
    ///
    /// Other channel ids are ignored without touching any state; the
    /// returned value is the channel that is actually active, so callers
    /// can detect the rejection.
    pub fn select_channel(&mut self, channel: u8) -> u8 {
        match channel {
            0 => self.ctrl &= !regs::CTRL_INPUT_SELECT,
            1 => self.ctrl |= regs::CTRL_INPUT_SELECT,
            _ => return self.channel_id,
        }

        self.channel_id = channel;
        let ctrl = self.ctrl;
        self.write32(regs::CTRL0, ctrl);

        debug!("input channel {}", channel);
        self.channel_id
    }

    /// The active input channel.
    pub fn channel(&self) -> u8 {
        self.channel_id
    }

    /// Set the stored frame rate.
    ///
    /// Known quirk, kept for register-level compatibility: assembling the
    /// rate field masks the control mirror with the full-rate pattern
    /// (`0x3F`), which also clears the CPU buffer switch, frame store
    /// stop, swizzle and all sync polarity inversion bits. Callers that
    /// rely on those must reapply them after a rate change.
    pub fn set_frame_rate(&mut self, frame_rate: FrameRate) {
        self.ctrl &= regs::FRAME_RATE_MASK_FULL;

        match frame_rate {
            FrameRate::ThreeQuarters => self.ctrl |= regs::FRAME_RATE_MASK_75,
            FrameRate::Half => self.ctrl |= regs::FRAME_RATE_MASK_50,
            FrameRate::Quarter => self.ctrl |= regs::FRAME_RATE_MASK_25,
            FrameRate::Full => {}
        }

        let ctrl = self.ctrl;
        self.write32(regs::CTRL0, ctrl);

        debug!("frame rate {:?}: ctrl={:#06x}", frame_rate, self.ctrl);
    }

    /// Set the sync polarity inversion bits of one channel.
    ///
    /// Channel ids outside 0 and 1 are ignored without touching any
    /// state.
    pub fn set_sync_polarity(&mut self, channel: u8, hsync_inv: bool, vsync_inv: bool) {
        let (hsync_bit, vsync_bit) = match channel {
            0 => (regs::HSYNC_INVERT_CH_0, regs::VSYNC_INVERT_CH_0),
            1 => (regs::HSYNC_INVERT_CH_1, regs::VSYNC_INVERT_CH_1),
            _ => return,
        };

        if hsync_inv {
            self.ctrl |= hsync_bit;
        } else {
            self.ctrl &= !hsync_bit;
        }
        if vsync_inv {
            self.ctrl |= vsync_bit;
        } else {
            self.ctrl &= !vsync_bit;
        }

        let ctrl = self.ctrl;
        self.write32(regs::CTRL0, ctrl);

        debug!(
            "sync polarity ch{}: hsync_inv={} vsync_inv={}",
            channel, hsync_inv, vsync_inv
        );
    }

    /// In-memory mirror of the control register.
    pub fn control_word(&self) -> u32 {
        self.ctrl
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bring up capture: push all registers, arm the interrupts and set
    /// the enable bit.
    ///
    /// The frame-start interrupt stays masked when the core switches
    /// buffers in hardware.
    pub fn start(&mut self) {
        self.update_registers();

        let mut int_mask = regs::INT_RESOLUTION;
        if !self.hw_buffer_switch {
            int_mask |= regs::INT_FRAME_START;
        }
        self.clear_interrupt_status(0);
        self.set_interrupt_enabled(int_mask, true);

        self.set_operation(Operation::Enable, true);
        info!("capture started");
    }

    /// Stop capture: clear the enable bit and mask all interrupts.
    pub fn stop(&mut self) {
        self.set_operation(Operation::Enable, false);
        self.set_interrupt_enabled(regs::INT_ALL, false);
        info!("capture stopped");
    }

    /// Consume a resolution-change interrupt.
    ///
    /// Reads the resolution register and, when the reported size fits the
    /// hardware limits, re-derives bounds and crop as the full new frame
    /// and recomputes the scale steps. The accepted resolution is
    /// returned; the caller pushes registers afterwards as with any other
    /// geometry change.
    pub fn handle_resolution_change(&mut self) -> Result<(u32, u32), Error> {
        let (hres, vres) = self.resolution();

        if hres == 0 || hres > regs::MAX_IN_HRES || vres == 0 || vres > regs::MAX_IN_VRES {
            return Err(Error::ResolutionOutOfRange { hres, vres });
        }

        self.bounds = Rect::new(0, 0, hres, vres);
        self.crop = self.bounds;
        self.set_scale()?;

        info!("input resolution changed to {}x{}", hres, vres);
        Ok((hres, vres))
    }

    /// Raw resolution readback: horizontal in the low 16 bits, vertical
    /// in the high 16 bits.
    pub fn resolution(&mut self) -> (u32, u32) {
        let res = self.read32(regs::RESOLUTION);
        (res & 0xFFFF, res >> 16)
    }

    /// IP core version register.
    pub fn ip_version(&mut self) -> u32 {
        self.read32(regs::IP_VER)
    }

    /// Set the even and odd field video memory pointers.
    ///
    /// Bob mode uses only the even pointer; weave mode stores the two
    /// fields through both.
    pub fn set_memory_offsets(&mut self, even_ptr: u32, odd_ptr: u32) {
        self.write32(regs::MEM_OFFSET_EVEN, even_ptr);
        self.write32(regs::MEM_OFFSET_ODD, odd_ptr);
    }

    /// Trigger a CPU-driven video buffer switch.
    pub fn trigger_buffer_switch(&mut self) {
        self.write32(regs::VBUFF_SWITCH, 1);
    }

    // =========================================================================
    // Tonal adjustments
    // =========================================================================

    /// Set the output brightness, clamped to `[-50, 50]`.
    pub fn set_brightness(&mut self, brightness: i32) {
        self.brightness = brightness.clamp(-50, 50);
        let regval = tonal::encode_brightness(self.brightness);
        self.write32(regs::BRIGHTNESS, regval);
        debug!("brightness {} -> {:#x}", self.brightness, regval);
    }

    /// Set the output contrast, clamped to `[-50, 50]`.
    pub fn set_contrast(&mut self, contrast: i32) {
        self.contrast = contrast.clamp(-50, 50);
        let regval = tonal::encode_contrast_saturation(self.contrast);
        self.write32(regs::CONTRAST, regval);
        debug!("contrast {} -> {:#x}", self.contrast, regval);
    }

    /// Set the output color saturation, clamped to `[-50, 50]`.
    pub fn set_saturation(&mut self, saturation: i32) {
        self.saturation = saturation.clamp(-50, 50);
        let regval = tonal::encode_contrast_saturation(self.saturation);
        self.write32(regs::SATURATION, regval);
        debug!("saturation {} -> {:#x}", self.saturation, regval);
    }

    /// Set the output hue angle, clamped to `[-30, 30]` degrees.
    pub fn set_hue(&mut self, hue: i32) {
        self.hue = hue.clamp(-30, 30);
        let (reg_cos, reg_sin) = tonal::encode_hue(self.hue);
        self.write32(regs::COS_HUE, reg_cos);
        self.write32(regs::SIN_HUE, reg_sin);
        debug!("hue {} -> cos={:#x} sin={:#x}", self.hue, reg_cos, reg_sin);
    }

    /// Set the global pixel alpha. The value is truncated to 8 bits for
    /// the stored mirror and written to the register as given.
    pub fn set_pixel_alpha(&mut self, alpha: u32) {
        self.alpha = alpha as u8;
        self.write32(regs::PIX_ALPHA, alpha);
    }

    // =========================================================================
    // Stencil mask
    // =========================================================================

    /// Write a stencil mask bitmap into the BRAM window.
    ///
    /// `offset` and the buffer length are in mask words and must both be
    /// even; the write must fit inside the BRAM stride bound. A request
    /// that violates either is rejected before any word is written. Each
    /// mask word occupies two register slots, an addressing quirk of the
    /// BRAM window.
    pub fn write_stencil_mask(&mut self, mask: &[u32], offset: u32) -> Result<(), Error> {
        let length = mask.len() as u32;

        if offset % 2 != 0 || length % 2 != 0 {
            return Err(Error::StencilUnaligned { offset, length });
        }
        if offset >= regs::MAX_VMEM_STRIDE || offset + length > regs::MAX_VMEM_STRIDE {
            return Err(Error::StencilOutOfRange { offset, length });
        }

        let mut pos = regs::MASK_BRAM_OFFSET + offset * 2;
        for &word in mask {
            self.write32(pos, word);
            pos += 4;
        }

        debug!("stencil mask: {} words at offset {}", length, offset);
        Ok(())
    }

    // =========================================================================
    // Interrupts
    // =========================================================================

    /// Enable or disable the interrupts in `mask`.
    ///
    /// The hardware mask register has inverted polarity: a set bit masks
    /// the interrupt off, so enabling clears bits and disabling sets
    /// them. Bits outside `mask` are left unchanged.
    pub fn set_interrupt_enabled(&mut self, mask: u32, enable: bool) {
        if enable {
            self.int_mask &= !mask;
        } else {
            self.int_mask |= mask;
        }

        let int_mask = self.int_mask;
        self.write32(regs::INT_MASK, int_mask);
    }

    /// In-memory mirror of the interrupt mask register.
    pub fn interrupt_mask(&self) -> u32 {
        self.int_mask
    }

    /// Read the interrupt status register.
    pub fn interrupt_status(&mut self) -> u32 {
        self.read32(regs::INT_STAT)
    }

    /// Clear the status bits in `mask`; a zero mask clears every bit
    /// (the complement of zero is written).
    pub fn clear_interrupt_status(&mut self, mask: u32) {
        let isr = if mask != 0 { mask } else { !mask };
        self.write32(regs::INT_STAT, isr);
    }
}
