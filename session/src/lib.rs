#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session that wires the world, the pure systems and the adapters.
//!
//! A [`Session`] owns one independent game. Every public operation submits a
//! single command and then pumps the resulting events through persistent
//! memory, the render sink and the systems until no further commands are
//! produced.

mod render;
mod tracking;

pub use render::{NullSink, RenderSink};
pub use tracking::{ChannelSensor, PositionSensor, UnsupportedSensor};

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};

use geocache_core::{
    Command, Direction, Event, GeoBounds, GeoPoint, GridCoord, Rules, SpawnOracle,
    TrackingError,
};
use geocache_storage::{
    decode_save_code, encode_save_code, DurableStore, PersistentMemory, StorageError,
    TransferError,
};
use geocache_system_interactivity::Interactivity;
use geocache_system_lifecycle::Lifecycle;
use geocache_system_spawning::{Sha256Oracle, Spawning};
use geocache_system_win::WinEvaluator;
use geocache_world::{self as world, query, World};
use thiserror::Error;

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Persistent memory could not be written. Game state has still advanced.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Continuous tracking could not be started or stopped.
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    /// A save code could not be produced or understood.
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

struct Subscription {
    sensor: Box<dyn PositionSensor>,
    readings: Receiver<GeoPoint>,
}

/// One running game.
pub struct Session<R, O = Sha256Oracle> {
    world: World,
    lifecycle: Lifecycle<O>,
    interactivity: Interactivity,
    win: WinEvaluator,
    memory: PersistentMemory<Box<dyn DurableStore>>,
    sink: R,
    subscription: Option<Subscription>,
}

impl<R: RenderSink> Session<R> {
    /// Creates a session that spawns caches with the SHA-256 oracle.
    pub fn new<S>(rules: Rules, store: S, sink: R) -> Self
    where
        S: DurableStore + 'static,
    {
        Self::with_oracle(rules, Sha256Oracle, store, sink)
    }
}

impl<R: RenderSink, O: SpawnOracle> Session<R, O> {
    /// Creates a session that spawns caches with `oracle`.
    ///
    /// Persistent memory is loaded from `store` immediately; an unreadable
    /// payload starts the game with an empty memory.
    pub fn with_oracle<S>(rules: Rules, oracle: O, store: S, sink: R) -> Self
    where
        S: DurableStore + 'static,
    {
        let store: Box<dyn DurableStore> = Box::new(store);
        let memory = PersistentMemory::open(store);
        tracing::debug!(records = memory.len(), "session opened");

        Self {
            lifecycle: Lifecycle::new(Spawning::with_oracle(oracle, rules)),
            interactivity: Interactivity::new(&rules),
            win: WinEvaluator::new(&rules),
            world: World::with_rules(rules),
            memory,
            sink,
            subscription: None,
        }
    }

    /// Read access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Rules governing this session.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        query::rules(&self.world)
    }

    /// Persistent memory of modified cells.
    #[must_use]
    pub fn memory(&self) -> &PersistentMemory<Box<dyn DurableStore>> {
        &self.memory
    }

    /// Read access to the render sink.
    #[must_use]
    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Mutable access to the render sink.
    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// Reports whether a continuous tracking subscription is active.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.subscription.is_some()
    }

    /// Updates the visible geographic bounds.
    pub fn set_viewport(&mut self, bounds: GeoBounds) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Command::SetViewport { bounds })
    }

    /// Places the player at `position`.
    pub fn move_player(&mut self, position: GeoPoint) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Command::MovePlayer { position })
    }

    /// Moves the player one tile towards `direction`.
    pub fn step_player(&mut self, direction: Direction) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Command::StepPlayer { direction })
    }

    /// Clicks the cell at `coord`. Rejected clicks surface as
    /// [`Event::InteractionRejected`] and leave the game untouched.
    pub fn click(&mut self, coord: GridCoord) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Command::InteractCell { coord })
    }

    /// Starts over: clears the inventory, the won flag and persistent memory,
    /// then regenerates the visible cells.
    pub fn new_game(&mut self) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Command::NewGame)
    }

    /// Subscribes to continuous readings from `sensor`.
    ///
    /// A fix already known to the sensor is applied right away.
    pub fn start_tracking(
        &mut self,
        mut sensor: Box<dyn PositionSensor>,
    ) -> Result<Vec<Event>, SessionError> {
        if self.subscription.is_some() {
            tracing::warn!("tracking already active");
            return Err(TrackingError::TrackingAlreadyActive.into());
        }
        if !sensor.is_supported() {
            tracing::warn!("position sensor unsupported; keeping explicit movement only");
            return Err(TrackingError::PositionUnsupported.into());
        }

        let mut events = self.dispatch(Command::StartTracking)?;
        if let Some(reason) = tracking_rejection(&events) {
            return Err(reason.into());
        }

        let readings = sensor.watch();
        let initial = sensor.current();
        self.subscription = Some(Subscription { sensor, readings });
        tracing::info!("tracking started");

        if let Some(position) = initial {
            events.extend(self.move_player(position)?);
        }
        Ok(events)
    }

    /// Ends the active tracking subscription.
    pub fn stop_tracking(&mut self) -> Result<Vec<Event>, SessionError> {
        let Some(mut subscription) = self.subscription.take() else {
            tracing::warn!("no tracking subscription to stop");
            return Err(TrackingError::TrackingNotActive.into());
        };
        subscription.sensor.unwatch();

        let events = self.dispatch(Command::StopTracking)?;
        if let Some(reason) = tracking_rejection(&events) {
            return Err(reason.into());
        }
        tracing::info!("tracking stopped");
        Ok(events)
    }

    /// Drains pending sensor readings and moves the player to the latest one.
    ///
    /// Intermediate readings are skipped. Does nothing while tracking is off.
    pub fn pump_tracking(&mut self) -> Result<Vec<Event>, SessionError> {
        let Some(subscription) = &self.subscription else {
            return Ok(Vec::new());
        };

        let mut latest = None;
        loop {
            match subscription.readings.try_recv() {
                Ok(position) => latest = Some(position),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("position sensor closed its channel");
                    break;
                }
            }
        }

        match latest {
            Some(position) => self.move_player(position),
            None => Ok(Vec::new()),
        }
    }

    /// Encodes persistent memory as a portable save code.
    pub fn export_save_code(&self) -> Result<String, SessionError> {
        Ok(encode_save_code(&self.memory.records())?)
    }

    /// Replaces persistent memory with the records in `code` and rebuilds the
    /// visible cells from it. The inventory is kept.
    pub fn import_save_code(&mut self, code: &str) -> Result<Vec<Event>, SessionError> {
        let records = decode_save_code(code)?;
        tracing::info!(records = records.len(), "importing save code");
        self.memory.replace_all(records)?;
        self.dispatch(Command::ReloadCells)
    }

    /// Applies `command` and every follow-up command the systems request.
    ///
    /// Returns every event emitted along the way. A storage failure does not
    /// interrupt the cascade; the first one is reported once it settles.
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Event>, SessionError> {
        let mut pending = VecDeque::from([command]);
        let mut log = Vec::new();
        let mut fault = None;

        while let Some(command) = pending.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            if events.is_empty() {
                continue;
            }

            self.observe(&events, &mut fault);

            let mut follow_ups = Vec::new();
            self.run_systems(&events, &mut follow_ups);
            pending.extend(follow_ups);
            log.extend(events);
        }

        match fault {
            Some(error) => Err(error.into()),
            None => Ok(log),
        }
    }

    fn observe(&mut self, events: &[Event], fault: &mut Option<StorageError>) {
        for event in events {
            match event {
                Event::CellSpawned { data } | Event::CellRestored { data } => {
                    if let Some(snapshot) = query::cell(&self.world, data.grid_coord) {
                        self.sink.cell_shown(&snapshot);
                    }
                }
                Event::CellCulled { coord, modified } => {
                    tracing::trace!(?coord, modified, "cell culled");
                    self.sink.cell_hidden(*coord);
                }
                Event::CellInteractivityChanged { coord, .. } => self.refresh(*coord),
                Event::CellModified { data } => {
                    record(fault, self.memory.upsert(*data));
                    self.refresh(data.grid_coord);
                }
                Event::InventoryChanged { held } => self.sink.inventory_changed(*held),
                Event::PlayerMoved { position } => self.sink.player_moved(*position),
                Event::GameWon { value } => self.sink.game_won(*value),
                Event::GameReset => record(fault, self.memory.reset()),
                Event::InteractionRejected { coord, reason } => {
                    tracing::debug!(?coord, ?reason, "click ignored");
                }
                _ => {}
            }
        }
    }

    fn refresh(&mut self, coord: GridCoord) {
        if let Some(snapshot) = query::cell(&self.world, coord) {
            self.sink.cell_updated(&snapshot);
        }
    }

    fn run_systems(&self, events: &[Event], out: &mut Vec<Command>) {
        let cells = query::cell_view(&self.world);
        let memory = &self.memory;

        self.lifecycle
            .handle(events, &cells, |coord| memory.get(coord), out);
        self.interactivity
            .handle(events, &cells, query::player_position(&self.world), out);
        self.win.handle(events, query::has_won(&self.world), out);
    }
}

fn record(fault: &mut Option<StorageError>, result: Result<(), StorageError>) {
    if let Err(error) = result {
        tracing::warn!(%error, "failed to persist cell memory");
        if fault.is_none() {
            *fault = Some(error);
        }
    }
}

fn tracking_rejection(events: &[Event]) -> Option<TrackingError> {
    events.iter().find_map(|event| match event {
        Event::TrackingRejected { reason } => Some(*reason),
        _ => None,
    })
}
