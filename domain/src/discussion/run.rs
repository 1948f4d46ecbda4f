//! Per-run state of one in-flight user query

use super::consensus::ConsensusState;
use super::mode::{DiscussionMode, TurnBudget};
use crate::persona::Persona;
use std::time::{Duration, Instant};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    AwaitingTurn(Persona),
    AwaitingFinalSynthesis,
    Aborted,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::AwaitingTurn(Persona::Logical) => "awaiting_logical",
            RunPhase::AwaitingTurn(Persona::Creative) => "awaiting_creative",
            RunPhase::AwaitingFinalSynthesis => "awaiting_final_synthesis",
            RunPhase::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state of one run (Entity)
///
/// Owned by the orchestrator for the duration of a single `send_message`
/// call and dropped afterwards.
#[derive(Debug, Clone)]
pub struct ConversationRun {
    mode: DiscussionMode,
    budget: TurnBudget,
    phase: RunPhase,
    pairs_started: u8,
    consensus: ConsensusState,
    started_at: Instant,
    model_time: Duration,
    model_calls: usize,
    persona_turns: usize,
}

impl ConversationRun {
    /// Start a run; the turn budget is derived from the mode.
    pub fn new(mode: DiscussionMode, fixed_turns: TurnBudget) -> Self {
        Self {
            mode,
            budget: TurnBudget::for_mode(mode, fixed_turns),
            phase: RunPhase::Idle,
            pairs_started: 0,
            consensus: ConsensusState::None,
            started_at: Instant::now(),
            model_time: Duration::ZERO,
            model_calls: 0,
            persona_turns: 0,
        }
    }

    pub fn mode(&self) -> DiscussionMode {
        self.mode
    }

    pub fn budget(&self) -> TurnBudget {
        self.budget
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn consensus(&self) -> ConsensusState {
        self.consensus
    }

    pub fn pairs_started(&self) -> u8 {
        self.pairs_started
    }

    pub fn model_calls(&self) -> usize {
        self.model_calls
    }

    /// Persona entries this run has added to the transcript
    pub fn persona_turns(&self) -> usize {
        self.persona_turns
    }

    /// Accumulated model latency across all calls
    pub fn model_time(&self) -> Duration {
        self.model_time
    }

    /// Wall-clock time since the run started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn begin_turn(&mut self, persona: Persona) {
        self.phase = RunPhase::AwaitingTurn(persona);
    }

    pub fn begin_final_synthesis(&mut self) {
        self.phase = RunPhase::AwaitingFinalSynthesis;
    }

    /// Record a completed gateway call
    pub fn record_call(&mut self, elapsed_ms: u64) {
        self.model_calls += 1;
        self.model_time += Duration::from_millis(elapsed_ms);
    }

    /// Record a persona entry committed to the transcript
    pub fn record_turn(&mut self) {
        self.persona_turns += 1;
    }

    /// Fold a turn's stop flag into the agreement state.
    ///
    /// Fixed-turn runs ignore stop signals entirely.
    pub fn record_signal(&mut self, persona: Persona, stop_signaled: bool) {
        if self.mode.honours_stop_signals() {
            self.consensus = self.consensus.observe(persona, stop_signaled);
        }
    }

    /// Begin the next exchange pair; returns false once the budget is spent
    /// or the personas have agreed.
    pub fn start_pair(&mut self) -> bool {
        if self.consensus.is_reached() || self.pairs_started >= self.budget.pairs() {
            return false;
        }
        self.pairs_started += 1;
        true
    }

    /// Whether the current pair should end after the creative persona's turn.
    ///
    /// True once agreement is reached, and on the last configured pair of a
    /// fixed-turn run, where the final synthesis takes the place of the reply.
    pub fn ends_after_creative_turn(&self) -> bool {
        self.consensus.is_reached()
            || (self.mode == DiscussionMode::FixedTurns
                && self.pairs_started >= self.budget.pairs())
    }

    pub fn abort(&mut self) {
        self.phase = RunPhase::Aborted;
    }

    pub fn finish(&mut self) {
        self.phase = RunPhase::Idle;
    }
}
