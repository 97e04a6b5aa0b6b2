//! Human-readable order code generation
//!
//! Codes look like `ORD20260830-1001`: prefix, local date, then a running
//! number that resets when the date rolls over. The counter starts at 1000
//! so codes keep a fixed width through a realistic day.

use chrono::Local;
use parking_lot::Mutex;

const FIRST_NUMBER: u64 = 1000;

/// Generates unique order codes for one store instance
#[derive(Debug)]
pub struct OrderCodeGenerator {
    prefix: &'static str,
    state: Mutex<CounterState>,
}

#[derive(Debug)]
struct CounterState {
    date: String,
    next: u64,
}

impl OrderCodeGenerator {
    pub fn new() -> Self {
        Self::with_prefix("ORD")
    }

    pub fn with_prefix(prefix: &'static str) -> Self {
        Self {
            prefix,
            state: Mutex::new(CounterState {
                date: Self::today(),
                next: FIRST_NUMBER,
            }),
        }
    }

    fn today() -> String {
        Local::now().format("%Y%m%d").to_string()
    }

    /// Allocate the next code, resetting the counter on date rollover
    pub fn next(&self) -> String {
        let mut state = self.state.lock();
        let today = Self::today();
        if state.date != today {
            state.date = today;
            state.next = FIRST_NUMBER;
        }
        state.next += 1;
        format!("{}{}-{}", self.prefix, state.date, state.next)
    }
}

impl Default for OrderCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
