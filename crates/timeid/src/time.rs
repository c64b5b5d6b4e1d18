use std::time::{SystemTime, UNIX_EPOCH};

/// A trait for time sources that return a millisecond timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests. Timestamps are signed so that instants before the
/// Unix epoch stay representable and orderable.
///
/// # Example
///
/// ```
/// use timeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<i64> for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> T;
}

/// Wall-clock time source backed by [`SystemTime::now`].
///
/// No attempt is made to smooth over clock adjustments; callers that need
/// monotonic input should supply their own [`TimeSource`].
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource<i64> for SystemClock {
    fn current_millis(&self) -> i64 {
        system_time_millis(SystemTime::now())
    }
}

/// Converts a [`SystemTime`] into signed milliseconds relative to
/// [`UNIX_EPOCH`], saturating at the `i64` range.
#[must_use]
pub fn system_time_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i64::MIN),
    }
}
