//! Tick-keyed scheduled events
//!
//! Delayed work (staggered volley shots, the end of an answer lockout) is
//! queued against a logical tick and drained by the game loop. Nothing is
//! ever cancelled: each event carries enough identity for the handler to
//! recognize it as stale and do nothing.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::enemy::EnemyVariant;

/// Work to run at a later tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledEvent {
    /// Fire one shot of a volley from the enemy with this id
    EnemyShot { run_id: u32, enemy_id: u32, variant: EnemyVariant },
    /// Leave the answer lockout and present the next note
    EndLockout { run_id: u32, lockout_id: u32 },
}

#[derive(Debug, Clone)]
struct Entry {
    due_tick: u64,
    /// Insertion order, breaks ties so same-tick events run FIFO
    seq: u64,
    event: ScheduledEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due_tick == other.due_tick && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap, we want the earliest first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_tick
            .cmp(&self.due_tick)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event to run once `now_tick >= due_tick`
    pub fn schedule(&mut self, due_tick: u64, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry { due_tick, seq, event });
    }

    /// Remove and return every event due at or before `now_tick`, in order
    pub fn drain_due(&mut self, now_tick: u64) -> Vec<ScheduledEvent> {
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|e| e.due_tick <= now_tick) {
            if let Some(entry) = self.queue.pop() {
                due.push(entry.event);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
