//! Deferred task queue for delayed simulation effects
//!
//! Timed one-shot effects (lightning strike pulses, hit-flash clears) are
//! scheduled against a future tick and drained at the top of each tick.
//! Tasks reference entities by id only; ids are never reused, so a task
//! whose entity has been destroyed simply finds nothing and no-ops.
//! Ending a session clears the queue, so nothing scheduled before a
//! restart can touch the next play-through.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// A deferred simulation effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Task {
    /// One lightning strike damaging every live enemy
    LightningPulse,
    /// Clear the hit flash on an enemy (stale id = silent no-op)
    ClearEnemyFlash { enemy_id: u32 },
    /// Clear the hit flash on the player
    ClearPlayerFlash,
}

/// A task plus its due tick; `seq` keeps same-tick tasks in schedule order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct Scheduled {
    due: u64,
    seq: u64,
    task: Task,
}

/// Min-heap of deferred tasks keyed by due tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run once tick `due` is reached
    pub fn schedule(&mut self, due: u64, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { due, seq, task }));
    }

    /// Pop the next task whose due tick is <= `now`, if any
    pub fn pop_due(&mut self, now: u64) -> Option<Task> {
        match self.heap.peek() {
            Some(Reverse(s)) if s.due <= now => self.heap.pop().map(|Reverse(s)| s.task),
            _ => None,
        }
    }

    /// Drop every pending task (session end / restart)
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
