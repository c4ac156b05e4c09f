/// Session-wide totals of started and completed jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub started: u64,
    pub completed: u64,
}

impl Counters {
    pub fn next_id(&self) -> u64 {
        self.started + 1
    }

    pub fn record_started(&mut self) {
        self.started += 1;
    }

    pub fn record_completed(&mut self) {
        debug_assert!(self.completed < self.started);
        self.completed += 1;
    }

    pub fn running(&self) -> u64 {
        self.started - self.completed
    }
}
