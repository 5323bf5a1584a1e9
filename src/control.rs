// -------------------------------------------------------------------------------------------------

/// Normalized 2-D control position, as derived from a pointer on a display surface.
/// Both coordinates are always in range [0, 1].
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ControlPosition {
    x: f32,
    y: f32,
}

impl ControlPosition {
    /// Create a new position, clamping both coordinates into [0, 1]. NaN coordinates become 0.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: Self::clamp_unit(x),
            y: Self::clamp_unit(y),
        }
    }

    /// Normalize a pointer position by the extent of the display surface it's relative to.
    /// Empty surfaces map to the origin.
    pub fn from_pointer(x: f32, y: f32, width: f32, height: f32) -> Self {
        let normalize = |pos: f32, extent: f32| if extent > 0.0 { pos / extent } else { 0.0 };
        Self::new(normalize(x, width), normalize(y, height))
    }

    /// Horizontal position in range [0, 1].
    #[inline(always)]
    pub fn x(&self) -> f32 {
        self.x
    }
    /// Vertical position in range [0, 1].
    #[inline(always)]
    pub fn y(&self) -> f32 {
        self.y
    }

    fn clamp_unit(value: f32) -> f32 {
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Provides the control position which drives the oscillator bank's voice frequencies and
/// modulation depth. Polled once per scheduler step.
pub trait ControlSource {
    fn position(&self) -> ControlPosition;
}

impl ControlSource for ControlPosition {
    fn position(&self) -> ControlPosition {
        *self
    }
}

impl<F> ControlSource for F
where
    F: Fn() -> ControlPosition,
{
    fn position(&self) -> ControlPosition {
        self()
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pointer() {
        let pos = ControlPosition::from_pointer(640.0, 200.0, 1280.0, 800.0);
        assert_eq!(pos.x(), 0.5);
        assert_eq!(pos.y(), 0.25);

        // outside of the surface
        let pos = ControlPosition::from_pointer(-10.0, 1000.0, 1280.0, 800.0);
        assert_eq!(pos.x(), 0.0);
        assert_eq!(pos.y(), 1.0);

        // empty surface
        let pos = ControlPosition::from_pointer(10.0, 10.0, 0.0, 0.0);
        assert_eq!(pos, ControlPosition::default());
    }

    #[test]
    fn new_clamps() {
        let pos = ControlPosition::new(f32::NAN, 3.0);
        assert_eq!(pos.x(), 0.0);
        assert_eq!(pos.y(), 1.0);
    }

    #[test]
    fn sources() {
        let fixed = ControlPosition::new(0.25, 0.75);
        assert_eq!(fixed.position(), fixed);
        let closure = || ControlPosition::new(0.5, 0.5);
        assert_eq!(closure.position(), ControlPosition::new(0.5, 0.5));
    }
}
