use anyhow::{bail, Context, Result};
use geocache_core::{Direction, GeoPoint};

pub(crate) const HELP: &str = "\
commands:
  n | s | e | w        step one tile north, south, east or west
  click DX DY          interact with the cell DX columns east and DY rows north of you
  track                follow the position sensor
  fix LAT LNG          feed a sensor reading while tracking
  untrack              stop following the sensor
  show                 redraw the board
  reset                start a new game and forget every modified cell
  export               print a save code for the modified cells
  import CODE          replace the modified cells with a save code
  help                 show this text
  quit                 leave the game";

/// One line of player input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Input {
    Step(Direction),
    Click { dx: i32, dy: i32 },
    Track,
    Fix(GeoPoint),
    Untrack,
    Show,
    Reset,
    Export,
    Import(String),
    Help,
    Quit,
}

impl Input {
    /// Parses `line`, returning `None` for blank lines and `#` comments.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let input = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("n" | "north", []) => Self::Step(Direction::North),
            ("s" | "south", []) => Self::Step(Direction::South),
            ("e" | "east", []) => Self::Step(Direction::East),
            ("w" | "west", []) => Self::Step(Direction::West),
            ("click" | "c", [dx, dy]) => Self::Click {
                dx: dx.parse().with_context(|| format!("invalid column offset `{dx}`"))?,
                dy: dy.parse().with_context(|| format!("invalid row offset `{dy}`"))?,
            },
            ("track", []) => Self::Track,
            ("fix", [lat, lng]) => Self::Fix(GeoPoint::new(
                lat.parse().with_context(|| format!("invalid latitude `{lat}`"))?,
                lng.parse().with_context(|| format!("invalid longitude `{lng}`"))?,
            )),
            ("untrack", []) => Self::Untrack,
            ("show", []) => Self::Show,
            ("reset", []) => Self::Reset,
            ("export", []) => Self::Export,
            ("import", [code]) => Self::Import((*code).to_owned()),
            ("help" | "?", []) => Self::Help,
            ("quit" | "q" | "exit", []) => Self::Quit,
            _ => bail!("unrecognised command `{line}`; type `help`"),
        };
        Ok(Some(input))
    }
}
