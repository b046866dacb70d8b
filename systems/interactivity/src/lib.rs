#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Proximity system that decides which live cells accept interaction.

use geocache_core::{CellSnapshot, CellView, Command, CoordinateMapper, Event, GeoPoint, Rules};

/// Pure system that toggles cell interactivity as the player moves.
#[derive(Clone, Copy, Debug)]
pub struct Interactivity {
    mapper: CoordinateMapper,
    range: f64,
}

impl Interactivity {
    /// Creates an interactivity system using the range and tile size of `rules`.
    #[must_use]
    pub fn new(rules: &Rules) -> Self {
        Self {
            mapper: rules.mapper(),
            range: rules.interact_range,
        }
    }

    /// Reports whether a cell is within reach of `player`.
    #[must_use]
    pub fn in_range(&self, snapshot: &CellSnapshot, player: Option<GeoPoint>) -> bool {
        player.is_some_and(|player| {
            let center = self.mapper.cell_center(snapshot.data.grid_coord);
            player.distance_to(center) <= self.range
        })
    }

    /// Consumes world events and emits interactivity changes.
    ///
    /// A player move re-evaluates every live cell; a cell entering the store
    /// is evaluated on its own. Commands are emitted only for cells whose
    /// state actually differs, so repeating an evaluation is a no-op.
    pub fn handle(
        &self,
        events: &[Event],
        cells: &CellView,
        player: Option<GeoPoint>,
        out: &mut Vec<Command>,
    ) {
        let player_moved = events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. }));

        if player_moved {
            for snapshot in cells.iter() {
                self.reconcile(snapshot, player, out);
            }
            return;
        }

        for event in events {
            let coord = match event {
                Event::CellSpawned { data } | Event::CellRestored { data } => data.grid_coord,
                _ => continue,
            };
            if let Some(snapshot) = cells.get(coord) {
                self.reconcile(snapshot, player, out);
            }
        }
    }

    fn reconcile(&self, snapshot: &CellSnapshot, player: Option<GeoPoint>, out: &mut Vec<Command>) {
        let interactive = self.in_range(snapshot, player);
        if interactive != snapshot.interactive {
            out.push(Command::SetCellInteractive {
                coord: snapshot.data.grid_coord,
                interactive,
            });
        }
    }
}
