use std::time::Duration;

/// Leading + trailing edge rate limiter driven by host timestamps.
///
/// The first value of a burst is released immediately and opens a window of
/// `pause`. Values arriving inside the window replace each other; the last
/// one is released by [`Throttle::poll`] once the window has elapsed, which
/// opens the next window.
#[derive(Debug, Clone, PartialEq)]
pub struct Throttle<T> {
    pause: Duration,
    window_end: Option<Duration>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    #[must_use]
    pub fn new(pause: Duration) -> Self {
        Self {
            pause,
            window_end: None,
            pending: None,
        }
    }

    #[must_use]
    pub fn pause(&self) -> Duration {
        self.pause
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// End of the open window, if any.
    #[must_use]
    pub fn window_end(&self) -> Option<Duration> {
        self.window_end
    }

    /// Offers a value at `now`; returns it when it may be delivered immediately.
    pub fn push(&mut self, value: T, now: Duration) -> Option<T> {
        match self.window_end {
            Some(end) if now < end => {
                self.pending = Some(value);
                None
            }
            _ => {
                // A pending value from an elapsed window is superseded by `value`.
                self.pending = None;
                self.window_end = Some(now + self.pause);
                Some(value)
            }
        }
    }

    /// Releases the trailing value once its window has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let end = self.window_end?;
        if now < end {
            return None;
        }

        match self.pending.take() {
            Some(value) => {
                self.window_end = Some(now + self.pause);
                Some(value)
            }
            None => {
                self.window_end = None;
                None
            }
        }
    }

    /// Releases the pending value regardless of the window and closes it.
    pub fn flush(&mut self) -> Option<T> {
        self.window_end = None;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn elapsed_window_without_pending_closes() {
        let mut throttle = Throttle::new(ms(100));
        assert_eq!(throttle.push(1, ms(0)), Some(1));
        assert_eq!(throttle.poll(ms(100)), None);
        assert_eq!(throttle.window_end(), None);
    }

    #[test]
    fn trailing_release_reopens_window() {
        let mut throttle = Throttle::new(ms(100));
        assert_eq!(throttle.push(1, ms(0)), Some(1));
        assert_eq!(throttle.push(2, ms(10)), None);
        assert_eq!(throttle.poll(ms(120)), Some(2));
        assert_eq!(throttle.window_end(), Some(ms(220)));
        assert_eq!(throttle.push(3, ms(150)), None);
    }
}
