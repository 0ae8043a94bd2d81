use std::time::Duration;

/// Per-process statistics shown in the HUD
pub struct SessionStats {
    /// Time spent in the playing mode of the current session
    pub play_time: Duration,
    pub games_played: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            play_time: Duration::ZERO,
            games_played: 0,
        }
    }

    /// Account for one tick of active play
    pub fn on_tick(&mut self, tick: Duration) {
        self.play_time += tick;
    }

    pub fn on_game_start(&mut self) {
        self.play_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self) {
        self.games_played += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.play_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
