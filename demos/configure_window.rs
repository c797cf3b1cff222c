//! Example: configure a capture window against the mock bus.
//!
//! Run with: `cargo run --example configure_window`

use logiwin::{regs, Error, FrameGrabber, FrameRate, GrabberConfig, MockBus, Rect, RectKind};

fn main() -> Result<(), Error> {
    // Initialize logging (optional)
    env_logger::init();

    let config = GrabberConfig::default();
    let mut grabber = FrameGrabber::new(MockBus::new(), &config)?;

    // No device here; the mock bus records everything the core would
    // write to the register window.
    grabber.set_hw_access(true);

    // Capture the center 1280x720 of the 1080p input, scaled into a
    // 640x480 window at the display origin.
    grabber.set_rect(RectKind::Crop, Rect::new(320, 180, 1280, 720));
    grabber.set_rect(RectKind::Out, Rect::new(0, 0, 640, 480));
    grabber.set_scale()?;

    let (hstep, vstep) = grabber.scale_steps();
    println!("scale steps: h={:#x} v={:#x}", hstep, vstep);

    grabber.set_brightness(10);
    grabber.set_frame_rate(FrameRate::Half);
    grabber.update_registers();
    grabber.start();
    grabber.trigger_buffer_switch();

    println!("control register: {:#06x}", grabber.bus().reg(regs::CTRL0));
    println!("register writes:");
    for (offset, value) in grabber.bus().writes() {
        println!("  {:#05x} <- {:#010x}", offset, value);
    }

    grabber.stop();

    Ok(())
}
