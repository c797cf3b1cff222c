//! Window geometry: rectangles, clipping and output positioning.

/// A video rectangle in pixels/lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    /// Upper-left horizontal coordinate.
    pub left: u32,
    /// Upper-left vertical coordinate.
    pub top: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in lines.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Clip this rectangle against `referent`, per axis independently.
    ///
    /// The origin is clamped up to the referent's origin and the far edge
    /// down to the referent's far edge. Non-overlapping rectangles collapse
    /// to zero size; clipping never fails.
    pub fn clip_to(&mut self, referent: &Rect) {
        let mut end = self.left + self.width;
        let referent_end = referent.left + referent.width;
        if self.left < referent.left {
            self.left = referent.left;
        }
        if end > referent_end {
            end = referent_end;
        }
        self.width = end.saturating_sub(self.left);

        let mut end = self.top + self.height;
        let referent_end = referent.top + referent.height;
        if self.top < referent.top {
            self.top = referent.top;
        }
        if end > referent_end {
            end = referent_end;
        }
        self.height = end.saturating_sub(self.top);
    }
}

/// Absolute on-screen drawing coordinates of the output window.
///
/// Derived from the output rectangle by [`position_output`]; after every
/// positioning call `ul_x <= dr_x` and `ul_y <= dr_y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputCoords {
    /// Upper-left X.
    pub ul_x: u32,
    /// Upper-left Y.
    pub ul_y: u32,
    /// Down-right X.
    pub dr_x: u32,
    /// Down-right Y.
    pub dr_y: u32,
}

/// Selector for the rectangles held by the grabber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectKind {
    /// Clippable subregion of the input frame.
    Bounds,
    /// Capture region; stored as given, never clipped automatically.
    Crop,
    /// Desired output placement on the display surface.
    Out,
}

/// Position `check` on a display surface of `display_width` by
/// `display_height`, updating `output` with the resulting coordinates.
///
/// An origin past the display extent snaps that axis to full-size placement
/// at 0 and skips the far-edge clamping of both axes; otherwise the far edge
/// is clamped to the surface. The snap-vs-clamp asymmetry, and the fact that
/// a snapped call leaves the other axis' down-right coordinate untouched,
/// match the hardware-facing behavior and are relied upon by the register
/// update path.
pub fn position_output(
    check: &mut Rect,
    display_width: u32,
    display_height: u32,
    output: &mut OutputCoords,
) {
    let mut snapped = false;

    output.ul_x = check.left;
    output.ul_y = check.top;

    if check.left > display_width {
        check.left = 0;
        check.width = display_width;
        output.ul_x = 0;
        output.dr_x = display_width;

        snapped = true;
    }
    if check.top > display_height {
        check.top = 0;
        check.height = display_height;
        output.ul_y = 0;
        output.dr_y = display_height;

        snapped = true;
    }
    if snapped {
        return;
    }

    if check.left + check.width > display_width {
        check.width = display_width - check.left;
        output.dr_x = display_width;
    } else {
        output.dr_x = check.left + check.width;
    }
    if check.top + check.height > display_height {
        check.height = display_height - check.top;
        output.dr_y = display_height;
    } else {
        output.dr_y = check.top + check.height;
    }
}
