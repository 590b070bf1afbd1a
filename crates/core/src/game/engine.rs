//! Event loop: pops the next scheduled event and dispatches it to its handler.

use log::{error, trace};

use super::*;

impl Game {
    /// Processes events in `(rank, seq)` order until the player must act, the run
    /// ends, the queue drains or `max_events` events have been handled.
    pub fn advance(&mut self, max_events: u32) -> AdvanceResult {
        let mut processed = 0;
        let stop_reason = loop {
            if let Some(failure) = &self.failure {
                break AdvanceStopReason::EngineFailure(failure.clone());
            }
            if let Some(outcome) = self.outcome {
                break AdvanceStopReason::Finished(outcome);
            }
            if self.awaiting.is_some() {
                break AdvanceStopReason::AwaitingInput;
            }
            if processed >= max_events {
                break AdvanceStopReason::BudgetExhausted;
            }
            let Some(event) = self.scheduler.pop_next() else {
                break AdvanceStopReason::QueueEmpty;
            };

            self.current_rank = event.rank;
            processed += 1;
            if let Err(failure) = self.dispatch(event) {
                error!("{:?} at rank {} failed: {failure}", event.kind, event.rank);
                self.failure = Some(failure);
            }
        };
        AdvanceResult { processed_events: processed, stop_reason }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), SimError> {
        trace!("rank {}: {:?}", event.rank, event.kind);
        match event.kind {
            EventKind::Simple(SimpleAction::PlayerTurn) => self.player_turn(event),
            EventKind::Simple(SimpleAction::PlayerStatusTick(status)) => {
                self.player_status_tick(event, status);
                Ok(())
            }
            EventKind::Monster { index, action: MonsterAction::Turn } => {
                self.monster_turn(event, index)
            }
            EventKind::Monster { index, action: MonsterAction::StatusTick(status) } => {
                self.monster_status_tick(event, index, status)
            }
            EventKind::Cloud { pos, action } => {
                self.cloud_event(event, pos, action);
                Ok(())
            }
        }
    }
}
