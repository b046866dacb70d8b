use std::{
    io::{BufRead, Write},
    sync::mpsc::Sender,
};

use anyhow::{Context, Result};
use geocache_core::{Event, GeoBounds, GeoPoint, GridCoord};
use geocache_session::{ChannelSensor, PositionSensor, Session, UnsupportedSensor};
use geocache_storage::DurableStore;
use geocache_world::query;

use crate::{board::Board, config::Config, input::Input, input::HELP};

/// Whether the loop should keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Terminal front end driving one session.
pub(crate) struct Game {
    session: Session<Board>,
    radius: u32,
    sensor_available: bool,
    feeder: Option<Sender<GeoPoint>>,
}

impl Game {
    /// Opens a session over `store` and places the player at the configured
    /// starting point.
    pub(crate) fn new<S>(config: &Config, store: S, sensor_available: bool) -> Result<Self>
    where
        S: DurableStore + 'static,
    {
        let session = Session::new(config.rules, store, Board::default());
        let mut game = Self {
            session,
            radius: config.viewport_radius,
            sensor_available,
            feeder: None,
        };
        let _ = game.session.move_player(config.start())?;
        game.recenter()?;
        Ok(game)
    }

    /// Reads commands from `input` until it is exhausted or the player quits.
    pub(crate) fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        writeln!(out, "{}", query::welcome_banner(self.session.world()))?;
        writeln!(out, "{}", self.render())?;

        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let command = match Input::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(error) => {
                    writeln!(out, "{error:#}")?;
                    continue;
                }
            };

            match self.execute(command, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(error) => {
                    tracing::warn!("command failed: {error:#}");
                    writeln!(out, "error: {error:#}")?;
                }
            }

            if let Some(value) = self.session.sink_mut().take_win() {
                writeln!(out, "You are holding a {value}. You win!")?;
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: Input, out: &mut impl Write) -> Result<Flow> {
        match command {
            Input::Step(direction) => {
                let _ = self.session.step_player(direction)?;
                self.recenter()?;
                writeln!(out, "{}", self.render())?;
            }
            Input::Click { dx, dy } => {
                let center = self.player_cell();
                let coord = GridCoord::new(center.x() + dx, center.y() + dy);
                let events = self.session.click(coord)?;
                for event in &events {
                    if let Event::InteractionRejected { reason, .. } = event {
                        writeln!(out, "nothing happens ({reason:?})")?;
                    }
                }
                writeln!(out, "{}", self.render())?;
            }
            Input::Track => {
                let (sensor, feeder): (Box<dyn PositionSensor>, _) = if self.sensor_available {
                    let sensor = ChannelSensor::new(None);
                    let feeder = sensor.feeder();
                    (Box::new(sensor), Some(feeder))
                } else {
                    (Box::new(UnsupportedSensor), None)
                };
                let _ = self.session.start_tracking(sensor)?;
                self.feeder = feeder;
                writeln!(out, "tracking")?;
            }
            Input::Fix(position) => {
                let feeder = self
                    .feeder
                    .as_ref()
                    .filter(|_| self.session.is_tracking())
                    .context("not tracking; type `track` first")?;
                feeder.send(position).context("position sensor is gone")?;
                let _ = self.session.pump_tracking()?;
                self.recenter()?;
                writeln!(out, "{}", self.render())?;
            }
            Input::Untrack => {
                let _ = self.session.stop_tracking()?;
                self.feeder = None;
                writeln!(out, "stopped tracking")?;
            }
            Input::Show => writeln!(out, "{}", self.render())?,
            Input::Reset => {
                let _ = self.session.new_game()?;
                writeln!(out, "new game")?;
                writeln!(out, "{}", self.render())?;
            }
            Input::Export => writeln!(out, "{}", self.session.export_save_code()?)?,
            Input::Import(code) => {
                let _ = self.session.import_save_code(&code)?;
                writeln!(out, "imported {} cells", self.session.memory().len())?;
                writeln!(out, "{}", self.render())?;
            }
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn player_cell(&self) -> GridCoord {
        let mapper = self.session.rules().mapper();
        query::player_position(self.session.world())
            .map(|position| mapper.to_grid_coord(position))
            .unwrap_or_default()
    }

    fn recenter(&mut self) -> Result<()> {
        let Some(position) = query::player_position(self.session.world()) else {
            return Ok(());
        };
        let reach = f64::from(self.radius) * self.session.rules().tile_degrees;
        let _ = self
            .session
            .set_viewport(GeoBounds::around(position, reach))?;
        Ok(())
    }

    fn render(&self) -> String {
        let radius = i32::try_from(self.radius).unwrap_or(i32::MAX);
        self.session.sink().render(self.player_cell(), radius)
    }
}
