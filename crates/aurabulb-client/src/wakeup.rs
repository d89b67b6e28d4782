//! Wake-up light.
//!
//! Ramps the bulb from off to full brightness between two instants, one
//! level step at a time.

use std::thread;

use aurabulb_protocol::{FrameObserver, LightLevel};
use chrono::{Local, NaiveDateTime, TimeDelta};
use tracing::{debug, info};

use crate::client::AuraBulb;
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Source of the current time and a way to wait for a later one.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;

    /// Block until `instant`. Returns at once if it has already passed.
    fn sleep_until(&self, instant: NaiveDateTime);
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep_until(&self, instant: NaiveDateTime) {
        if let Ok(wait) = (instant - self.now()).to_std() {
            thread::sleep(wait);
        }
    }
}

/// A linear brightness ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeupRamp {
    start: NaiveDateTime,
    end: NaiveDateTime,
    max_level: LightLevel,
}

impl WakeupRamp {
    /// Create a ramp up to full brightness.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> ClientResult<Self> {
        if end <= start {
            return Err(ClientError::InvalidRamp { start, end });
        }
        Ok(WakeupRamp {
            start,
            end,
            max_level: LightLevel::MAX,
        })
    }

    /// Stop the ramp at `level` instead of full brightness.
    pub fn with_max_level(mut self, level: LightLevel) -> Self {
        self.max_level = level;
        self
    }

    /// Get the start of the ramp.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Get the end of the ramp.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Get the final level.
    pub fn max_level(&self) -> LightLevel {
        self.max_level
    }

    /// Instants at which the level is updated: one per level step,
    /// evenly spaced from start to end.
    pub fn schedule(&self) -> Vec<NaiveDateTime> {
        let steps = i32::from(self.max_level.get());
        if steps == 0 {
            return vec![self.start];
        }
        let span = self.end - self.start;
        (0..=steps)
            .map(|i| self.start + span * i / steps)
            .collect()
    }

    /// Level the bulb should show at `now`.
    pub fn level_at(&self, now: NaiveDateTime) -> LightLevel {
        let max = i64::from(self.max_level.get());
        let total = (self.end - self.start).num_milliseconds();
        let elapsed = (now - self.start).num_milliseconds().clamp(0, total);
        let level = if total == 0 { max } else { max * elapsed / total };
        // level is within 0..=max_level, which is itself a valid level
        LightLevel::new(level as u8).unwrap_or(self.max_level)
    }

    /// Drive the bulb through the ramp, blocking until the end.
    ///
    /// Does nothing if the ramp is already over. Otherwise the light is
    /// switched to level 0 first. Returns the number of level updates sent
    /// after that.
    pub fn run<T, O>(&self, bulb: &mut AuraBulb<T, O>, clock: &impl Clock) -> ClientResult<usize>
    where
        T: Transport,
        O: FrameObserver,
    {
        if clock.now() > self.end {
            info!(end = %self.end, "wake-up window already over");
            return Ok(0);
        }
        bulb.set_light_level(LightLevel::OFF)?;

        let schedule = self.schedule();
        debug!(steps = schedule.len(), step = %self.step(), "wake-up scheduled");

        let mut updates = 0;
        for instant in schedule {
            clock.sleep_until(instant);
            let level = self.level_at(clock.now());
            info!(level = level.get(), "setting level");
            bulb.set_light_level(level)?;
            updates += 1;
        }
        Ok(updates)
    }

    fn step(&self) -> TimeDelta {
        match i32::from(self.max_level.get()) {
            0 => TimeDelta::zero(),
            steps => (self.end - self.start) / steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 20)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_rejects_backwards_ramp() {
        assert!(WakeupRamp::new(at(8, 30, 0), at(8, 0, 0)).is_err());
        assert!(WakeupRamp::new(at(8, 0, 0), at(8, 0, 0)).is_err());
    }

    #[test]
    fn test_schedule_spacing() {
        let ramp = WakeupRamp::new(at(8, 0, 0), at(8, 35, 0)).unwrap();
        let schedule = ramp.schedule();
        assert_eq!(schedule.len(), 211);
        assert_eq!(schedule[0], at(8, 0, 0));
        // 35 minutes over 210 steps is 10 seconds per step
        assert_eq!(schedule[1], at(8, 0, 10));
        assert_eq!(schedule[210], at(8, 35, 0));
    }

    #[test]
    fn test_level_at() {
        let ramp = WakeupRamp::new(at(8, 0, 0), at(8, 35, 0)).unwrap();
        assert_eq!(ramp.level_at(at(7, 0, 0)).get(), 0);
        assert_eq!(ramp.level_at(at(8, 0, 0)).get(), 0);
        assert_eq!(ramp.level_at(at(8, 0, 19)).get(), 1);
        assert_eq!(ramp.level_at(at(8, 17, 30)).get(), 105);
        assert_eq!(ramp.level_at(at(8, 35, 0)).get(), 210);
        assert_eq!(ramp.level_at(at(9, 0, 0)).get(), 210);
    }

    #[test]
    fn test_custom_max_level() {
        let ramp = WakeupRamp::new(at(8, 0, 0), at(8, 10, 0))
            .unwrap()
            .with_max_level(LightLevel::new(10).unwrap());
        assert_eq!(ramp.schedule().len(), 11);
        assert_eq!(ramp.schedule()[1], at(8, 1, 0));
        assert_eq!(ramp.level_at(at(8, 5, 30)).get(), 5);
    }

    #[test]
    fn test_zero_max_level() {
        let ramp = WakeupRamp::new(at(8, 0, 0), at(8, 10, 0))
            .unwrap()
            .with_max_level(LightLevel::OFF);
        assert_eq!(ramp.schedule(), vec![at(8, 0, 0)]);
        assert_eq!(ramp.level_at(at(8, 5, 0)).get(), 0);
    }
}
