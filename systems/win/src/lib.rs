#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Win evaluation system.

use geocache_core::{Command, Event, Rules};

/// Pure system that requests a win once the held token is large enough.
#[derive(Clone, Copy, Debug)]
pub struct WinEvaluator {
    requirement: u32,
}

impl WinEvaluator {
    /// Creates an evaluator for the win requirement in `rules`.
    #[must_use]
    pub const fn new(rules: &Rules) -> Self {
        Self {
            requirement: rules.win_requirement,
        }
    }

    /// Inspects inventory changes and emits [`Command::DeclareWin`] when the
    /// final held token meets the requirement. Nothing is emitted once the
    /// game has already been won.
    pub fn handle(&self, events: &[Event], already_won: bool, out: &mut Vec<Command>) {
        if already_won {
            return;
        }

        let held = events.iter().rev().find_map(|event| match event {
            Event::InventoryChanged { held } => Some(*held),
            _ => None,
        });

        if let Some(Some(token)) = held {
            if token.value() >= self.requirement {
                out.push(Command::DeclareWin);
            }
        }
    }
}
