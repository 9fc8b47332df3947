/// Time source for "sent N ago" labels, fade deadlines, and the post-scroll
/// cooldown. A trait so tests can drive the session with a fixed clock.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;
}

/// Wall-clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a > 1_600_000_000_000); // sanity: after 2020
    }
}
