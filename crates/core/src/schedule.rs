//! Discrete-event scheduler on the logical rank timeline.
//! This module exists to totally order every pending turn, status timer and cloud tick.
//! It does not own what events do when they fire; the game dispatches them.
//!
//! Ordering is `(rank, seq)` ascending. `push` hands out increasing sequence
//! numbers starting at 1; `push_again` uses sequence 0 so an event that
//! re-queues itself without delay runs before anything else created at that rank.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::types::{MonsterIdx, MonsterStatus, PlayerStatus, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SimpleAction {
    PlayerTurn,
    PlayerStatusTick(PlayerStatus),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonsterAction {
    Turn,
    StatusTick(MonsterStatus),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CloudAction {
    FogDissipate,
    NightDissipate,
    FireBurn,
    TemporaryWallExpire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Simple(SimpleAction),
    Monster { index: MonsterIdx, action: MonsterAction },
    Cloud { pos: Pos, action: CloudAction },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub rank: i64,
    pub kind: EventKind,
}

impl Event {
    pub fn new(rank: i64, kind: EventKind) -> Self {
        Self { rank, kind }
    }

    pub fn rank(&self) -> i64 {
        self.rank
    }

    /// The same event moved `delay` ranks later.
    pub fn renewed(self, delay: u32) -> Self {
        Self { rank: self.rank + i64::from(delay), kind: self.kind }
    }
}

/// An event together with its insertion sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scheduled {
    pub seq: u64,
    pub event: Event,
}

impl Scheduled {
    fn key(&self) -> (i64, u64, EventKind) {
        (self.event.rank, self.seq, self.event.kind)
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed so the max-heap yields the smallest key first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scheduler {
    #[serde(rename = "pending")]
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new(), next_seq: 1 }
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { seq, event });
    }

    /// Re-queues an event with sequence 0 so it precedes every other event of its rank.
    pub fn push_again(&mut self, event: Event) {
        self.heap.push(Scheduled { seq: 0, event });
    }

    /// Renews `event` by `delay` and queues it. A zero delay keeps its place at the head.
    pub fn reschedule(&mut self, event: Event, delay: u32) {
        if delay == 0 {
            self.push_again(event);
        } else {
            self.push(event.renewed(delay));
        }
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        self.heap.pop().map(|scheduled| scheduled.event)
    }

    pub fn peek_rank(&self) -> Option<i64> {
        self.heap.peek().map(|scheduled| scheduled.event.rank)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Pending events in firing order.
    pub fn pending(&self) -> Vec<Scheduled> {
        let mut pending: Vec<Scheduled> = self.heap.iter().cloned().collect();
        pending.sort_by(|a, b| b.cmp(a));
        pending
    }
}
