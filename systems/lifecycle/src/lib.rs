#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cache lifecycle system that reconciles live cells with the viewport.
//!
//! Every viewport change culls live cells that fell out of view and fills
//! the remaining rectangle: cells recalled from persistent memory are
//! restored verbatim, all others are regenerated through [`Spawning`].
//! Coordinates where the oracle places no cache stay absent.

use geocache_core::{CellData, CellView, Command, Event, GridCoord, SpawnOracle, Viewport};
use geocache_system_spawning::{Sha256Oracle, Spawning};

/// Pure system that emits cull, restore and spawn commands.
#[derive(Clone, Debug)]
pub struct Lifecycle<O = Sha256Oracle> {
    spawning: Spawning<O>,
}

impl<O: SpawnOracle> Lifecycle<O> {
    /// Creates a lifecycle system that generates missing cells with `spawning`.
    #[must_use]
    pub fn new(spawning: Spawning<O>) -> Self {
        Self { spawning }
    }

    /// Consumes world events and emits the commands that bring the live cell
    /// set in line with the most recent viewport.
    ///
    /// The `recall` closure should look up persistent memory; a `Some` result
    /// takes precedence over regeneration.
    pub fn handle<F>(&self, events: &[Event], cells: &CellView, mut recall: F, out: &mut Vec<Command>)
    where
        F: FnMut(GridCoord) -> Option<CellData>,
    {
        let Some(viewport) = latest_viewport(events) else {
            return;
        };

        for snapshot in cells.iter() {
            let coord = snapshot.data.grid_coord;
            if !viewport.contains(coord) {
                out.push(Command::CullCell { coord });
            }
        }

        for coord in viewport.iter() {
            if cells.contains(coord) {
                continue;
            }

            if let Some(data) = recall(coord) {
                out.push(Command::RestoreCell { data });
            } else if let Some(data) = self.spawning.determine(coord) {
                out.push(Command::SpawnCell { data });
            }
        }
    }
}

fn latest_viewport(events: &[Event]) -> Option<Viewport> {
    events.iter().rev().find_map(|event| match event {
        Event::ViewportChanged { viewport } => Some(*viewport),
        _ => None,
    })
}
