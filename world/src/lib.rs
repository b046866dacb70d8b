#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Geocache.
//!
//! The world owns the live cell store, the single-slot inventory, the player
//! position, the visible viewport and the tracking flag. It never performs
//! I/O and never consults the spawn oracle: cells are materialised only when a
//! system submits [`Command::SpawnCell`] or [`Command::RestoreCell`].

use std::collections::BTreeMap;

use geocache_core::{
    CellData, Command, Event, GeoPoint, GridCoord, InteractionRejection, Rules, Token,
    TrackingError, Viewport, WELCOME_BANNER,
};

/// Represents the authoritative Geocache world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    cells: BTreeMap<GridCoord, Cell>,
    inventory: Option<Token>,
    player: Option<GeoPoint>,
    viewport: Option<Viewport>,
    tracking: bool,
    won: bool,
}

impl World {
    /// Creates a new world using the default rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a new world governed by the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        Self {
            banner: WELCOME_BANNER,
            rules,
            cells: BTreeMap::new(),
            inventory: None,
            player: None,
            viewport: None,
            tracking: false,
            won: false,
        }
    }

    fn insert_cell(&mut self, data: CellData) -> bool {
        let coord = data.grid_coord;
        let in_view = self
            .viewport
            .is_some_and(|viewport| viewport.contains(coord));
        if !in_view || self.cells.contains_key(&coord) {
            tracing::debug!(?coord, in_view, "ignoring cell outside viewport or already live");
            return false;
        }

        let _ = self.cells.insert(
            coord,
            Cell {
                data,
                interactive: false,
            },
        );
        true
    }

    fn move_player(&mut self, position: GeoPoint, out_events: &mut Vec<Event>) {
        self.player = Some(position);
        out_events.push(Event::PlayerMoved { position });
    }

    fn interact(&mut self, coord: GridCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.check_interaction(coord) {
            tracing::debug!(?coord, ?reason, "interaction rejected");
            out_events.push(Event::InteractionRejected { coord, reason });
            return;
        }

        let Some(cell) = self.cells.get_mut(&coord) else {
            return;
        };

        // Equal tokens whose double would overflow fall through to a swap.
        let merged = match (self.inventory, cell.data.token) {
            (Some(held), Some(token)) if held == token => token.doubled(),
            _ => None,
        };

        if let Some(merged) = merged {
            cell.data.token = Some(merged);
            self.inventory = None;
            out_events.push(Event::TokensMerged {
                coord,
                token: merged,
            });
        } else {
            let (held, token) = (self.inventory, cell.data.token);
            cell.data.token = held;
            self.inventory = token;
            out_events.push(Event::TokensSwapped {
                coord,
                cell: held,
                held: token,
            });
        }

        cell.data.modified = true;
        let data = cell.data;
        out_events.push(Event::InventoryChanged {
            held: self.inventory,
        });
        out_events.push(Event::CellModified { data });
    }

    fn check_interaction(&self, coord: GridCoord) -> Result<(), InteractionRejection> {
        if self.player.is_none() {
            return Err(InteractionRejection::PlayerUnplaced);
        }
        let cell = self
            .cells
            .get(&coord)
            .ok_or(InteractionRejection::UnknownCell)?;
        if !cell.interactive {
            return Err(InteractionRejection::OutOfRange);
        }
        Ok(())
    }

    fn cull_all(&mut self, out_events: &mut Vec<Event>) {
        for (coord, cell) in std::mem::take(&mut self.cells) {
            out_events.push(Event::CellCulled {
                coord,
                modified: cell.data.modified,
            });
        }
    }

    fn replay_viewport(&self, out_events: &mut Vec<Event>) {
        if let Some(viewport) = self.viewport {
            out_events.push(Event::ViewportChanged { viewport });
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.cull_all(out_events);
        self.inventory = None;
        self.won = false;
        out_events.push(Event::InventoryChanged { held: None });
        out_events.push(Event::GameReset);
        self.replay_viewport(out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetViewport { bounds } => {
            let viewport = world.rules.mapper().viewport_for(bounds);
            if world.viewport != Some(viewport) {
                world.viewport = Some(viewport);
                out_events.push(Event::ViewportChanged { viewport });
            }
        }
        Command::SpawnCell { data } => {
            let data = CellData {
                modified: false,
                ..data
            };
            if world.insert_cell(data) {
                out_events.push(Event::CellSpawned { data });
            }
        }
        Command::RestoreCell { data } => {
            if world.insert_cell(data) {
                out_events.push(Event::CellRestored { data });
            }
        }
        Command::CullCell { coord } => {
            if let Some(cell) = world.cells.remove(&coord) {
                out_events.push(Event::CellCulled {
                    coord,
                    modified: cell.data.modified,
                });
            }
        }
        Command::MovePlayer { position } => world.move_player(position, out_events),
        Command::StepPlayer { direction } => {
            if let Some(current) = world.player {
                let next = current.stepped(direction, world.rules.tile_degrees);
                world.move_player(next, out_events);
            } else {
                tracing::debug!(?direction, "ignoring step before player placement");
            }
        }
        Command::SetCellInteractive { coord, interactive } => {
            if let Some(cell) = world.cells.get_mut(&coord) {
                if cell.interactive != interactive {
                    cell.interactive = interactive;
                    out_events.push(Event::CellInteractivityChanged { coord, interactive });
                }
            }
        }
        Command::InteractCell { coord } => world.interact(coord, out_events),
        Command::DeclareWin => {
            let Some(held) = world.inventory else {
                return;
            };
            if !world.won && held.value() >= world.rules.win_requirement {
                world.won = true;
                tracing::info!(value = held.value(), "win requirement reached");
                out_events.push(Event::GameWon {
                    value: held.value(),
                });
            }
        }
        Command::StartTracking => {
            if world.tracking {
                out_events.push(Event::TrackingRejected {
                    reason: TrackingError::TrackingAlreadyActive,
                });
            } else {
                world.tracking = true;
                out_events.push(Event::TrackingStarted);
            }
        }
        Command::StopTracking => {
            if world.tracking {
                world.tracking = false;
                out_events.push(Event::TrackingStopped);
            } else {
                out_events.push(Event::TrackingRejected {
                    reason: TrackingError::TrackingNotActive,
                });
            }
        }
        Command::ReloadCells => {
            world.cull_all(out_events);
            world.replay_viewport(out_events);
        }
        Command::NewGame => {
            tracing::info!("starting a new game");
            world.reset(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use geocache_core::{CellSnapshot, CellView, GeoPoint, GridCoord, Rules, Token, Viewport};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rules governing the world.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Captures a read-only view of every live cell.
    #[must_use]
    pub fn cell_view(world: &World) -> CellView {
        CellView::from_snapshots(world.cells.values().map(|cell| cell.snapshot()).collect())
    }

    /// Snapshot of the live cell at `coord`, if any.
    #[must_use]
    pub fn cell(world: &World, coord: GridCoord) -> Option<CellSnapshot> {
        world.cells.get(&coord).map(|cell| cell.snapshot())
    }

    /// Token currently held by the player.
    #[must_use]
    pub fn inventory(world: &World) -> Option<Token> {
        world.inventory
    }

    /// Current player position, if it has been initialised.
    #[must_use]
    pub fn player_position(world: &World) -> Option<GeoPoint> {
        world.player
    }

    /// Currently visible grid rectangle, if one has been reported.
    #[must_use]
    pub fn viewport(world: &World) -> Option<Viewport> {
        world.viewport
    }

    /// Reports whether the win requirement has been reached this game.
    #[must_use]
    pub fn has_won(world: &World) -> bool {
        world.won
    }

    /// Reports whether continuous position tracking is active.
    #[must_use]
    pub fn is_tracking(world: &World) -> bool {
        world.tracking
    }
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    data: CellData,
    interactive: bool,
}

impl Cell {
    fn snapshot(&self) -> geocache_core::CellSnapshot {
        geocache_core::CellSnapshot {
            data: self.data,
            interactive: self.interactive,
        }
    }
}
