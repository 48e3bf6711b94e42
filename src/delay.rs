//! Blocking delay used between fade steps.
//!
//! The engine sleeps through [`DelayNs`] from `embedded-hal`, so board HAL
//! delays plug in directly. [`StdDelay`] covers hosts.

use core::time::Duration;
pub use embedded_hal::delay::DelayNs;

/// Blocks for `duration`, splitting it into calls `DelayNs` can represent.
pub(crate) fn delay_for<D: DelayNs>(delay: &mut D, duration: Duration) {
    let mut millis = duration.as_millis();
    while millis > 0 {
        let chunk = u32::try_from(millis).unwrap_or(u32::MAX);
        delay.delay_ms(chunk);
        millis -= u128::from(chunk);
    }

    let nanos = duration.subsec_nanos() % 1_000_000;
    if nanos > 0 {
        delay.delay_ns(nanos);
    }
}

/// `DelayNs` backed by `std::thread::sleep`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
