//! Deferred transitions queued on the habitat scheduler.
//!
//! A task names the entity it acts on by id and, for agent tasks, the
//! timer epoch it was scheduled under. The dispatcher drops any task whose
//! entity is gone or whose epoch no longer matches, so an action that was
//! interrupted never gets finished by its own stale timer.

use roost_types::{AgentId, EggId};

/// One deferred transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// A random ground peck is over.
    ResumeAfterPeck {
        /// The pecking agent.
        agent: AgentId,
        /// Epoch the peck started under.
        epoch: u64,
    },
    /// A peck at a feed pile is over.
    FinishFeedPeck {
        /// The pecking agent.
        agent: AgentId,
        /// Epoch the peck started under.
        epoch: u64,
        /// Whether the peck emptied the pile.
        feed_gone: bool,
    },
    /// Laying is over; the egg appears.
    FinishLaying {
        /// The laying adult.
        agent: AgentId,
        /// Epoch laying started under.
        epoch: u64,
    },
    /// Nudge an adult that just stood up from an egg.
    SettleAfterSit {
        /// The adult that stood up.
        agent: AgentId,
    },
    /// The randomized ride timeout elapsed.
    RideTimeout {
        /// The riding juvenile.
        agent: AgentId,
        /// Epoch the ride started under.
        epoch: u64,
    },
    /// The incubator has moved away; the egg starts cracking.
    BeginHatching {
        /// The incubated egg.
        egg: EggId,
    },
    /// Show the next hatch frame, hatching on the last one.
    HatchPhase {
        /// The hatching egg.
        egg: EggId,
        /// Index into the hatch frame list.
        phase: usize,
    },
    /// Take the empty shell off the board.
    RemoveShell {
        /// The hatched egg.
        egg: EggId,
    },
}

impl Task {
    /// Short label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ResumeAfterPeck { .. } => "resume_after_peck",
            Self::FinishFeedPeck { .. } => "finish_feed_peck",
            Self::FinishLaying { .. } => "finish_laying",
            Self::SettleAfterSit { .. } => "settle_after_sit",
            Self::RideTimeout { .. } => "ride_timeout",
            Self::BeginHatching { .. } => "begin_hatching",
            Self::HatchPhase { .. } => "hatch_phase",
            Self::RemoveShell { .. } => "remove_shell",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_name_the_variant() {
        let egg = EggId::new();
        assert_eq!(Task::HatchPhase { egg, phase: 2 }.label(), "hatch_phase");
        assert_eq!(
            Task::RideTimeout {
                agent: AgentId::new(),
                epoch: 3
            }
            .label(),
            "ride_timeout"
        );
    }
}
