//! Coalescing render scheduler.
//!
//! Mutations never paint directly; they arm the scheduler, and the owner
//! drains it once per paint tick. Any number of requests between ticks
//! collapse into a single cycle, so the pending work is bounded regardless
//! of request burst size. Intermediate states may never be painted; only
//! the state current when a cycle actually runs is observed.
//!
//! A generation token guards against work completing after [`RenderScheduler::invalidate`]:
//! anything holding a stale generation must drop its result instead of
//! mutating torn-down state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug)]
pub struct RenderScheduler {
    state: SchedulerState,
    generation: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation.0
    }

    /// Record that a repaint is owed. Requests arriving while one is
    /// already owed are absorbed.
    pub fn request(&mut self) {
        self.state = SchedulerState::Scheduled;
    }

    /// Claim the owed cycle, if any. Returns the generation the cycle runs
    /// under; the scheduler returns to `Idle` so requests arriving during
    /// the cycle re-arm it for exactly one follow-up.
    pub fn begin_cycle(&mut self) -> Option<Generation> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Scheduled => {
                self.state = SchedulerState::Idle;
                Some(Generation(self.generation))
            }
        }
    }

    /// Drop any owed cycle and advance the generation so in-flight work
    /// completing later is recognizably stale.
    pub fn invalidate(&mut self) {
        self.state = SchedulerState::Idle;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let scheduler = RenderScheduler::new();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn begin_cycle_without_request_yields_nothing() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.begin_cycle().is_none());
    }

    #[test]
    fn burst_of_requests_collapses_to_one_cycle() {
        let mut scheduler = RenderScheduler::new();
        for _ in 0..100 {
            scheduler.request();
        }
        assert!(scheduler.begin_cycle().is_some());
        assert!(scheduler.begin_cycle().is_none());
    }

    #[test]
    fn request_during_cycle_arms_exactly_one_followup() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request();
        let cycle = scheduler.begin_cycle();
        assert!(cycle.is_some());

        // Mutations landing while the cycle is "in flight".
        scheduler.request();
        scheduler.request();

        assert!(scheduler.begin_cycle().is_some());
        assert!(scheduler.begin_cycle().is_none());
    }

    #[test]
    fn invalidate_drops_owed_cycle_and_advances_generation() {
        let mut scheduler = RenderScheduler::new();
        let before = scheduler.generation();
        scheduler.request();
        scheduler.invalidate();
        assert!(scheduler.begin_cycle().is_none());
        assert!(!scheduler.is_current(before));
    }

    #[test]
    fn generation_claimed_before_invalidate_is_stale_after() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request();
        let generation = scheduler.begin_cycle().expect("cycle owed");
        assert!(scheduler.is_current(generation));
        scheduler.invalidate();
        assert!(!scheduler.is_current(generation));
    }
}
