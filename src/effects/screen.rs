use rand::Rng;

/// Hue step between neighbouring snake segments, in degrees
const HUE_STEP: u32 = 10;

/// Camera jitter after eating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenShake {
    pub frames_left: u32,
    /// Current camera offset in cells
    pub offset: (i32, i32),
}

impl ScreenShake {
    pub fn start(&mut self, frames: u32) {
        self.frames_left = frames;
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R, magnitude: i32) {
        if self.frames_left > 0 {
            self.offset = (
                rng.gen_range(-magnitude..=magnitude),
                rng.gen_range(-magnitude..=magnitude),
            );
            self.frames_left -= 1;
        } else {
            self.offset = (0, 0);
        }
    }

    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }
}

/// Timed colour cycling granted by the rainbow power-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rainbow {
    pub enabled: bool,
    pub remaining_ticks: u32,
    /// Hue rotation, advanced every tick while enabled
    pub offset: u32,
}

impl Rainbow {
    pub fn activate(&mut self, duration_ticks: u32) {
        self.enabled = true;
        self.remaining_ticks = duration_ticks;
    }

    /// Count one tick off the duration; switches off when it runs out
    pub fn tick_duration(&mut self) {
        if self.enabled {
            self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
            if self.remaining_ticks == 0 {
                self.enabled = false;
            }
        }
    }

    pub fn advance_hue(&mut self) {
        if self.enabled {
            self.offset = self.offset.wrapping_add(1);
        }
    }

    /// Hue in degrees for the segment at `index` (0 is the head)
    pub fn hue_for_segment(&self, index: usize) -> u32 {
        ((index as u32).wrapping_mul(HUE_STEP).wrapping_add(self.offset)) % 360
    }

    pub fn seconds_left(&self, tick_rate_hz: u32) -> u32 {
        self.remaining_ticks / tick_rate_hz.max(1)
    }
}
