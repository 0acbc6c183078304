/// Which kind of wave a scroll event plants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveKind {
    Grow,
    Retract,
}

/// Turns absolute scroll offsets into a scrolling-down signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTracker {
    last_offset: f32,
    mode: WaveKind,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScrollTracker {
    pub fn new(offset: f32) -> Self {
        Self {
            last_offset: offset,
            mode: WaveKind::Grow,
        }
    }

    /// Records a scroll event and returns the wave it triggers.
    ///
    /// Any increase in offset grows; no change or a decrease retracts.
    /// Every event yields a wave, there is no debouncing.
    pub fn scrolled(&mut self, offset: f32) -> WaveKind {
        self.mode = if offset - self.last_offset > 0.0 {
            WaveKind::Grow
        } else {
            WaveKind::Retract
        };
        self.last_offset = offset;
        self.mode
    }

    pub fn scrolling_down(&self) -> bool {
        self.mode == WaveKind::Grow
    }

    #[cfg(test)]
    pub(crate) fn last_offset(&self) -> f32 {
        self.last_offset
    }
}
