use std::time::Duration;

/// Fixed-interval playback clock driven by the host's frame time.
///
/// Nothing is scheduled: the host reports elapsed time through
/// [`Playback::advance`] and gets back how many ticks are due.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    playing: bool,
    interval: Duration,
    accumulated: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl Playback {
    pub fn new(interval: Duration) -> Self {
        Self {
            playing: false,
            // A zero interval would tick forever
            interval: interval.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stops ticking. Returns true only for the call that actually stopped playback.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.playing;
        self.playing = false;
        self.accumulated = Duration::ZERO;
        was_playing
    }

    /// Flips between playing and stopped; returns the new playing flag
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.stop();
        } else {
            self.play();
        }
        self.playing
    }

    /// Adds `elapsed` and returns the number of whole intervals now due
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.playing {
            return 0;
        }
        self.accumulated += elapsed;
        let mut ticks = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            ticks += 1;
        }
        ticks
    }

    /// Time until the next tick is due, for scheduling a repaint
    pub fn time_to_next_tick(&self) -> Option<Duration> {
        self.playing
            .then(|| self.interval.saturating_sub(self.accumulated))
    }
}

/// Frame index after `ticks` steps from `current`, wrapping around `frame_count`
pub fn next_frame_index(current: usize, ticks: usize, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    (current + ticks % frame_count) % frame_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_every_interval() {
        let mut playback = Playback::default();
        assert_eq!(playback.advance(Duration::from_millis(500)), 0);

        playback.play();
        assert_eq!(playback.advance(Duration::from_millis(50)), 0);
        assert_eq!(playback.advance(Duration::from_millis(60)), 1);
        assert_eq!(playback.advance(Duration::from_millis(290)), 3);
    }

    #[test]
    fn stop_reports_once() {
        let mut playback = Playback::default();
        assert!(playback.toggle());
        assert!(playback.stop());
        assert!(!playback.stop());
        assert_eq!(playback.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn frame_index_wraps() {
        assert_eq!(next_frame_index(2, 1, 3), 0);
        assert_eq!(next_frame_index(0, 7, 3), 1);
        assert_eq!(next_frame_index(0, 1, 1), 0);
    }
}
