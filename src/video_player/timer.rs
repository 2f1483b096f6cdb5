// SPDX-License-Identifier: MPL-2.0
//! Re-armable one-shot tasks with an explicit deadline.
//!
//! The manager's decode and presentation loops are two of these. A task
//! fires at most once per arming; a task that wants to run again re-arms
//! itself from inside its tick.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ScheduledTask {
    name: &'static str,
    deadline: Option<Instant>,
}

impl ScheduledTask {
    /// Creates a disarmed task.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            deadline: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Schedules the task at `deadline`, replacing any previous deadline.
    pub fn arm_at(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Schedules the task `delay` after `now`.
    pub fn arm_after(&mut self, now: Instant, delay: Duration) {
        self.arm_at(now + delay);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true if the task is armed and its deadline has passed.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_disarmed() {
        let task = ScheduledTask::new("decode");
        assert_eq!(task.name(), "decode");
        assert!(!task.is_armed());
        assert!(!task.is_due(Instant::now()));
    }

    #[test]
    fn armed_task_becomes_due_at_deadline() {
        let now = Instant::now();
        let mut task = ScheduledTask::new("present");
        task.arm_after(now, Duration::from_millis(16));

        assert!(!task.is_due(now));
        assert!(task.is_due(now + Duration::from_millis(16)));
        assert_eq!(task.deadline(), Some(now + Duration::from_millis(16)));
    }

    #[test]
    fn rearming_replaces_deadline() {
        let now = Instant::now();
        let mut task = ScheduledTask::new("present");
        task.arm_after(now, Duration::from_secs(1));
        task.arm_at(now);

        assert!(task.is_due(now));
    }

    #[test]
    fn disarm_cancels_deadline() {
        let now = Instant::now();
        let mut task = ScheduledTask::new("decode");
        task.arm_at(now);
        task.disarm();

        assert!(!task.is_due(now));
    }
}
