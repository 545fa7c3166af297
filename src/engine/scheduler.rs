//! Deadline bookkeeping for the two periodic refresh triggers.
//!
//! The scheduler is pure state over `Instant`s; the TUI event loop sleeps
//! until `next_deadline()` and asks `due()` which ticks fired. Whether a
//! tick actually starts a cycle is the loop's call (a tick that lands while
//! the matching cycle kind is still in flight is skipped; the timer has
//! already advanced, so the next tick retries).

use std::time::{Duration, Instant};

use crate::model::Config;

/// Cadence of the global pass over all standard views. Independent of the
/// 30s cache freshness window.
pub const GLOBAL_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Non-forced sequential pass over view indices 0..views.len()
    Global,
    /// Forced fetch of the activity slot. `initial` marks the immediate
    /// firing after (re)arming, which is folded as its own initial load.
    Activity { initial: bool },
}

#[derive(Debug)]
pub struct PollingScheduler {
    next_global: Instant,
    activity: Option<ActivityTimer>,
}

#[derive(Debug)]
struct ActivityTimer {
    interval: Duration,
    next: Instant,
    fired: bool,
}

impl PollingScheduler {
    pub fn new(config: &Config, now: Instant) -> Self {
        let activity = config
            .activity
            .as_ref()
            .filter(|a| a.enabled)
            .map(|a| ActivityTimer {
                interval: Duration::from_secs(a.polling_interval_minutes * 60),
                // Fires immediately on arm
                next: now,
                fired: false,
            });
        PollingScheduler {
            next_global: now + GLOBAL_REFRESH_INTERVAL,
            activity,
        }
    }

    /// Cancel and restart both timers against a new configuration.
    pub fn rearm(&mut self, config: &Config, now: Instant) {
        *self = PollingScheduler::new(config, now);
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Instant {
        match &self.activity {
            Some(a) => self.next_global.min(a.next),
            None => self.next_global,
        }
    }

    /// Pop every tick due at `now`, advancing the timers that fired.
    pub fn due(&mut self, now: Instant) -> Vec<Tick> {
        let mut ticks = Vec::new();
        if now >= self.next_global {
            ticks.push(Tick::Global);
            self.next_global = now + GLOBAL_REFRESH_INTERVAL;
        }
        if let Some(activity) = &mut self.activity
            && now >= activity.next
        {
            ticks.push(Tick::Activity {
                initial: !activity.fired,
            });
            activity.fired = true;
            activity.next = now + activity.interval;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityConfig, ViewConfig};

    fn config(activity_minutes: Option<u64>) -> Config {
        Config {
            project: "PROJ".into(),
            domain: "example.atlassian.net".into(),
            views: vec![ViewConfig {
                name: "Open".into(),
                jql: "status = Open".into(),
            }],
            activity: activity_minutes.map(|m| ActivityConfig {
                enabled: true,
                polling_interval_minutes: m,
                jql: "updated >= -1h".into(),
            }),
        }
    }

    #[test]
    fn nothing_due_before_first_global_interval() {
        let t0 = Instant::now();
        let mut sched = PollingScheduler::new(&config(None), t0);
        assert!(sched.due(t0 + Duration::from_secs(59)).is_empty());
        assert_eq!(sched.due(t0 + Duration::from_secs(60)), vec![Tick::Global]);
        // Timer advanced: not due again immediately
        assert!(sched.due(t0 + Duration::from_secs(61)).is_empty());
    }

    #[test]
    fn activity_fires_immediately_on_arm_as_initial() {
        let t0 = Instant::now();
        let mut sched = PollingScheduler::new(&config(Some(5)), t0);
        assert_eq!(sched.next_deadline(), t0);
        assert_eq!(sched.due(t0), vec![Tick::Activity { initial: true }]);
        // Next firing follows the configured cadence and is no longer initial
        let later = t0 + Duration::from_secs(5 * 60);
        assert_eq!(
            sched.due(later),
            vec![Tick::Global, Tick::Activity { initial: false }]
        );
    }

    #[test]
    fn the_two_cadences_are_independent() {
        let t0 = Instant::now();
        let mut sched = PollingScheduler::new(&config(Some(2)), t0);
        sched.due(t0); // initial activity firing

        // At 60s only the global timer fires
        assert_eq!(sched.due(t0 + Duration::from_secs(60)), vec![Tick::Global]);
        // At 120s both are due (global rescheduled from 60s)
        let ticks = sched.due(t0 + Duration::from_secs(120));
        assert!(ticks.contains(&Tick::Global));
        assert!(ticks.contains(&Tick::Activity { initial: false }));
    }

    #[test]
    fn rearm_restarts_both_timers() {
        let t0 = Instant::now();
        let mut sched = PollingScheduler::new(&config(None), t0);
        sched.due(t0 + Duration::from_secs(60));

        let t1 = t0 + Duration::from_secs(90);
        sched.rearm(&config(Some(1)), t1);
        // Global deadline measured from rearm time, activity immediate again
        assert_eq!(sched.next_deadline(), t1);
        assert_eq!(sched.due(t1), vec![Tick::Activity { initial: true }]);
        assert!(sched.due(t1 + Duration::from_secs(59)).is_empty());
        assert_eq!(sched.due(t1 + Duration::from_secs(60)), vec![Tick::Global, Tick::Activity { initial: false }]);
    }

    #[test]
    fn disabled_activity_never_ticks() {
        let mut cfg = config(Some(1));
        cfg.activity.as_mut().unwrap().enabled = false;
        let t0 = Instant::now();
        let mut sched = PollingScheduler::new(&cfg, t0);
        let ticks = sched.due(t0 + Duration::from_secs(3600));
        assert_eq!(ticks, vec![Tick::Global]);
    }
}
