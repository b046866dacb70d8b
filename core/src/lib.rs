#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the geocache engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Geocache.";

/// Side length of a single grid cell measured in degrees.
pub const TILE_DEGREES: f64 = 1e-4;

/// Probability that any given grid cell holds a cache.
pub const CACHE_SPAWN_PROBABILITY: f64 = 0.1;

/// Maximum distance, in degrees, between the player and a cell center for the
/// cell to accept interaction.
pub const INTERACTABLE_RANGE: f64 = TILE_DEGREES * 3.0;

/// Token value the player must hold to win.
pub const WIN_REQUIREMENT: u32 = 32;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the visible region with the grid rectangle covering `bounds`.
    SetViewport {
        /// Geographic bounds reported by the map viewport.
        bounds: GeoBounds,
    },
    /// Materialises a freshly generated cell inside the viewport.
    SpawnCell {
        /// Generated contents of the cell.
        data: CellData,
    },
    /// Materialises a previously modified cell recalled from persistent memory.
    RestoreCell {
        /// Persisted contents of the cell.
        data: CellData,
    },
    /// Removes a live cell that left the viewport.
    CullCell {
        /// Grid coordinate of the cell to cull.
        coord: GridCoord,
    },
    /// Places the player at an absolute geographic position.
    MovePlayer {
        /// New position of the player.
        position: GeoPoint,
    },
    /// Moves the player by a single tile in the provided direction.
    StepPlayer {
        /// Direction of travel.
        direction: Direction,
    },
    /// Updates whether a live cell lies within interaction range.
    SetCellInteractive {
        /// Grid coordinate of the cell.
        coord: GridCoord,
        /// Whether the cell should accept interaction.
        interactive: bool,
    },
    /// Player clicked the cell at the provided coordinate.
    InteractCell {
        /// Grid coordinate of the clicked cell.
        coord: GridCoord,
    },
    /// Marks the game as won.
    DeclareWin,
    /// Requests that continuous position tracking begins.
    StartTracking,
    /// Requests that continuous position tracking ends.
    StopTracking,
    /// Culls every live cell and regenerates the visible area, keeping the
    /// inventory. Used after persistent memory was replaced wholesale.
    ReloadCells,
    /// Discards all progress and regenerates the visible area.
    NewGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The visible grid rectangle changed.
    ViewportChanged {
        /// Rectangle that is now visible.
        viewport: Viewport,
    },
    /// A freshly generated cell became live.
    CellSpawned {
        /// Contents of the new cell.
        data: CellData,
    },
    /// A persisted cell became live again.
    CellRestored {
        /// Contents recalled from persistent memory.
        data: CellData,
    },
    /// A live cell was removed from the cell store.
    CellCulled {
        /// Grid coordinate of the removed cell.
        coord: GridCoord,
        /// Whether the cell had been modified before removal.
        modified: bool,
    },
    /// The player position changed.
    PlayerMoved {
        /// Position of the player after the move.
        position: GeoPoint,
    },
    /// A live cell entered or left interaction range.
    CellInteractivityChanged {
        /// Grid coordinate of the cell.
        coord: GridCoord,
        /// Whether the cell now accepts interaction.
        interactive: bool,
    },
    /// The held token merged into an equal token on the clicked cell.
    TokensMerged {
        /// Grid coordinate of the clicked cell.
        coord: GridCoord,
        /// Token the cell holds after the merge.
        token: Token,
    },
    /// The held token and the cell token traded places.
    TokensSwapped {
        /// Grid coordinate of the clicked cell.
        coord: GridCoord,
        /// Token the cell holds after the swap.
        cell: Option<Token>,
        /// Token the player holds after the swap.
        held: Option<Token>,
    },
    /// The inventory slot changed contents.
    InventoryChanged {
        /// Token currently held, if any.
        held: Option<Token>,
    },
    /// A cell diverged from its generated state and must be persisted.
    CellModified {
        /// Contents of the cell after modification.
        data: CellData,
    },
    /// A click was ignored.
    InteractionRejected {
        /// Grid coordinate referenced by the click.
        coord: GridCoord,
        /// Specific reason the click was ignored.
        reason: InteractionRejection,
    },
    /// The player reached the win requirement.
    GameWon {
        /// Value of the token that triggered the win.
        value: u32,
    },
    /// Continuous tracking became active.
    TrackingStarted,
    /// Continuous tracking ended.
    TrackingStopped,
    /// A tracking request was refused.
    TrackingRejected {
        /// Specific reason the request was refused.
        reason: TrackingError,
    },
    /// All progress was discarded.
    GameReset,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing latitude.
    North,
    /// Movement toward increasing longitude.
    East,
    /// Movement toward decreasing latitude.
    South,
    /// Movement toward decreasing longitude.
    West,
}

impl Direction {
    /// Unit offset applied to `(lat, lng)` when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> (f64, f64) {
        match self {
            Self::North => (1.0, 0.0),
            Self::East => (0.0, 1.0),
            Self::South => (-1.0, 0.0),
            Self::West => (0.0, -1.0),
        }
    }
}

/// Identity of a single grid cell. `x` runs east along longitude and `y`
/// runs north along latitude.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    x: i32,
    y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index along the longitude axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index along the latitude axis.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Continuous geographic position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Creates a new geographic position.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Planar distance to `other`, measured in degrees.
    #[must_use]
    pub fn distance_to(self, other: GeoPoint) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }

    /// Position displaced by one tile of `tile_degrees` in `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction, tile_degrees: f64) -> Self {
        let (lat, lng) = direction.offset();
        Self {
            lat: self.lat + lat * tile_degrees,
            lng: self.lng + lng * tile_degrees,
        }
    }
}

/// Axis-aligned geographic rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    south_west: GeoPoint,
    north_east: GeoPoint,
}

impl GeoBounds {
    /// Creates bounds from two opposite corners.
    #[must_use]
    pub const fn new(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Bounds extending `radius` degrees around `center` in every direction.
    #[must_use]
    pub fn around(center: GeoPoint, radius: f64) -> Self {
        Self {
            south_west: GeoPoint::new(center.lat() - radius, center.lng() - radius),
            north_east: GeoPoint::new(center.lat() + radius, center.lng() + radius),
        }
    }

    /// South-west corner of the rectangle.
    #[must_use]
    pub const fn south_west(&self) -> GeoPoint {
        self.south_west
    }

    /// North-east corner of the rectangle.
    #[must_use]
    pub const fn north_east(&self) -> GeoPoint {
        self.north_east
    }

    /// Geometric center of the rectangle.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.lat() + self.north_east.lat()) / 2.0,
            (self.south_west.lng() + self.north_east.lng()) / 2.0,
        )
    }
}

/// Converts between geographic positions and grid cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    tile_degrees: f64,
}

impl CoordinateMapper {
    /// Creates a mapper for cells of `tile_degrees` on each side.
    #[must_use]
    pub const fn new(tile_degrees: f64) -> Self {
        Self { tile_degrees }
    }

    /// Side length of a cell in degrees.
    #[must_use]
    pub const fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    /// Grid cell nearest to the provided position.
    #[must_use]
    pub fn to_grid_coord(&self, point: GeoPoint) -> GridCoord {
        GridCoord::new(
            scale_to_index(point.lng() / self.tile_degrees),
            scale_to_index(point.lat() / self.tile_degrees),
        )
    }

    /// Geographic rectangle covered by `coord`.
    ///
    /// The south-west corner sits at `coord * tile_degrees` and the cell
    /// extends one tile north and east from there.
    #[must_use]
    pub fn to_geo_bounds(&self, coord: GridCoord) -> GeoBounds {
        let south = f64::from(coord.y()) * self.tile_degrees;
        let west = f64::from(coord.x()) * self.tile_degrees;
        GeoBounds::new(
            GeoPoint::new(south, west),
            GeoPoint::new(south + self.tile_degrees, west + self.tile_degrees),
        )
    }

    /// Geometric center of the cell at `coord`.
    #[must_use]
    pub fn cell_center(&self, coord: GridCoord) -> GeoPoint {
        self.to_geo_bounds(coord).center()
    }

    /// Grid rectangle covering the provided geographic bounds.
    #[must_use]
    pub fn viewport_for(&self, bounds: GeoBounds) -> Viewport {
        let south_west = self.to_grid_coord(bounds.south_west());
        let north_east = self.to_grid_coord(bounds.north_east());
        Viewport::new(
            north_east.y().max(south_west.y()),
            north_east.y().min(south_west.y()),
            north_east.x().max(south_west.x()),
            north_east.x().min(south_west.x()),
        )
    }
}

fn scale_to_index(scaled: f64) -> i32 {
    let rounded = scaled.round();
    if rounded.is_nan() {
        return 0;
    }
    rounded.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Collectible token held by cells and by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Token {
    value: u32,
}

impl Token {
    /// Creates a token with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    /// Numeric value of the token.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Whether the value is one a token can legitimately carry.
    #[must_use]
    pub const fn is_power_of_two(&self) -> bool {
        self.value.is_power_of_two()
    }

    /// Token produced by merging two tokens of this value, or `None` when the
    /// result does not fit.
    #[must_use]
    pub const fn doubled(self) -> Option<Self> {
        match self.value.checked_mul(2) {
            Some(value) => Some(Self { value }),
            None => None,
        }
    }
}

/// Persistable essence of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    /// Token held by the cell, if any.
    pub token: Option<Token>,
    /// Grid coordinate identifying the cell.
    pub grid_coord: GridCoord,
    /// Whether a player interaction altered the cell since generation.
    pub modified: bool,
}

impl CellData {
    /// Creates unmodified cell contents as produced by generation.
    #[must_use]
    pub const fn generated(grid_coord: GridCoord, token: Option<Token>) -> Self {
        Self {
            token,
            grid_coord,
            modified: false,
        }
    }
}

/// Rectangle of grid coordinates that must hold live cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    north: i32,
    south: i32,
    east: i32,
    west: i32,
}

impl Viewport {
    /// Creates a viewport from inclusive edges.
    #[must_use]
    pub const fn new(north: i32, south: i32, east: i32, west: i32) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Northernmost row, inclusive.
    #[must_use]
    pub const fn north(&self) -> i32 {
        self.north
    }

    /// Southernmost row, inclusive.
    #[must_use]
    pub const fn south(&self) -> i32 {
        self.south
    }

    /// Easternmost column, inclusive.
    #[must_use]
    pub const fn east(&self) -> i32 {
        self.east
    }

    /// Westernmost column, inclusive.
    #[must_use]
    pub const fn west(&self) -> i32 {
        self.west
    }

    /// Reports whether `coord` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.x() >= self.west
            && coord.x() <= self.east
            && coord.y() >= self.south
            && coord.y() <= self.north
    }

    /// Iterates every coordinate inside the rectangle, row by row from south.
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> {
        let (west, east) = (self.west, self.east);
        (self.south..=self.north)
            .flat_map(move |y| (west..=east).map(move |x| GridCoord::new(x, y)))
    }
}

/// Probability thresholds splitting generated tokens into value tiers.
///
/// A second oracle draw below `single` yields a 1, below `double` a 2, and
/// anything above yields a 4.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenTiers {
    /// Upper bound of the tier that produces value 1.
    pub single: f64,
    /// Upper bound of the tier that produces value 2.
    pub double: f64,
}

impl Default for TokenTiers {
    fn default() -> Self {
        Self {
            single: 0.7,
            double: 0.92,
        }
    }
}

impl TokenTiers {
    /// Maps an oracle draw in `[0, 1)` onto a token.
    #[must_use]
    pub fn token_for(&self, draw: f64) -> Token {
        if draw < self.single {
            Token::new(1)
        } else if draw < self.double {
            Token::new(2)
        } else {
            Token::new(4)
        }
    }
}

/// Tunable gameplay constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Side length of a grid cell in degrees.
    pub tile_degrees: f64,
    /// Probability that a cell holds a cache.
    pub spawn_probability: f64,
    /// Interaction radius in degrees measured to cell centers.
    pub interact_range: f64,
    /// Token value that wins the game.
    pub win_requirement: u32,
    /// Value tiers used when generating tokens.
    pub token_tiers: TokenTiers,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tile_degrees: TILE_DEGREES,
            spawn_probability: CACHE_SPAWN_PROBABILITY,
            interact_range: INTERACTABLE_RANGE,
            win_requirement: WIN_REQUIREMENT,
            token_tiers: TokenTiers::default(),
        }
    }
}

impl Rules {
    /// Coordinate mapper configured with this rule set's tile size.
    #[must_use]
    pub const fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.tile_degrees)
    }
}

/// Deterministic pseudo-random oracle consulted when generating cells.
pub trait SpawnOracle {
    /// Maps `seed` to a value in `[0, 1)`; identical seeds yield identical values.
    fn luck(&self, seed: &str) -> f64;
}

impl<T: SpawnOracle + ?Sized> SpawnOracle for &T {
    fn luck(&self, seed: &str) -> f64 {
        (**self).luck(seed)
    }
}

/// Reasons a click on a cell may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionRejection {
    /// The player position has not been initialised yet.
    PlayerUnplaced,
    /// No live cell exists at the coordinate.
    UnknownCell,
    /// The cell lies outside interaction range.
    OutOfRange,
}

/// Failures raised while starting or stopping continuous position tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum TrackingError {
    /// A tracking subscription is already active.
    #[error("position tracking is already active")]
    TrackingAlreadyActive,
    /// No tracking subscription is active.
    #[error("position tracking is not active")]
    TrackingNotActive,
    /// The position provider is unavailable on this platform.
    #[error("position tracking is not supported")]
    PositionUnsupported,
}

/// Immutable representation of a single live cell used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSnapshot {
    /// Persistable contents of the cell.
    pub data: CellData,
    /// Whether the cell currently accepts interaction.
    pub interactive: bool,
}

/// Read-only snapshot describing all live cells.
#[derive(Clone, Debug, Default)]
pub struct CellView {
    snapshots: Vec<CellSnapshot>,
}

impl CellView {
    /// Creates a new cell view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CellSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.data.grid_coord);
        Self { snapshots }
    }

    /// Iterator over the captured cell snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CellSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the cell at `coord`, if it is live.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<&CellSnapshot> {
        self.snapshots
            .binary_search_by_key(&coord, |snapshot| snapshot.data.grid_coord)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Reports whether a live cell exists at `coord`.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Number of live cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no cells are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellData, CellSnapshot, CellView, CoordinateMapper, GeoBounds, GeoPoint, GridCoord,
        Token, TokenTiers, TrackingError, Viewport, TILE_DEGREES,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_coord_survives_geo_round_trip() {
        let mapper = CoordinateMapper::new(TILE_DEGREES);
        for x in -40..40 {
            for y in [-369_979, -7, 0, 1, 369_979] {
                let coord = GridCoord::new(x, y);
                let bounds = mapper.to_geo_bounds(coord);
                assert_eq!(mapper.to_grid_coord(bounds.south_west()), coord);
            }
        }
    }

    #[test]
    fn geo_bounds_extend_one_tile_north_east() {
        let mapper = CoordinateMapper::new(0.5);
        let bounds = mapper.to_geo_bounds(GridCoord::new(2, -3));
        assert_eq!(bounds.south_west(), GeoPoint::new(-1.5, 1.0));
        assert_eq!(bounds.north_east(), GeoPoint::new(-1.0, 1.5));
        assert_eq!(mapper.cell_center(GridCoord::new(2, -3)), GeoPoint::new(-1.25, 1.25));
    }

    #[test]
    fn to_grid_coord_rounds_to_nearest() {
        let mapper = CoordinateMapper::new(1.0);
        assert_eq!(mapper.to_grid_coord(GeoPoint::new(2.4, -0.6)), GridCoord::new(-1, 2));
        assert_eq!(mapper.to_grid_coord(GeoPoint::new(2.6, 0.4)), GridCoord::new(0, 3));
    }

    #[test]
    fn viewport_orders_edges() {
        let mapper = CoordinateMapper::new(1.0);
        let bounds = GeoBounds::new(GeoPoint::new(3.0, 4.0), GeoPoint::new(-1.0, -2.0));
        let viewport = mapper.viewport_for(bounds);
        assert_eq!(viewport, Viewport::new(3, -1, 4, -2));
        assert!(viewport.contains(GridCoord::new(0, 0)));
        assert!(!viewport.contains(GridCoord::new(5, 0)));
        assert_eq!(viewport.iter().count(), 5 * 7);
    }

    #[test]
    fn viewport_iteration_covers_inclusive_edges() {
        let viewport = Viewport::new(1, 0, 1, 0);
        let coords: Vec<GridCoord> = viewport.iter().collect();
        assert_eq!(
            coords,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(1, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn token_tiers_partition_draws() {
        let tiers = TokenTiers::default();
        assert_eq!(tiers.token_for(0.0), Token::new(1));
        assert_eq!(tiers.token_for(0.75), Token::new(2));
        assert_eq!(tiers.token_for(0.99), Token::new(4));
    }

    #[test]
    fn token_doubles_until_overflow() {
        assert_eq!(Token::new(16).doubled(), Some(Token::new(32)));
        assert_eq!(Token::new(1 << 30).doubled(), Some(Token::new(1 << 31)));
        assert_eq!(Token::new(1 << 31).doubled(), None);
    }

    #[test]
    fn only_powers_of_two_are_valid_tokens() {
        assert!(Token::new(1).is_power_of_two());
        assert!(Token::new(1 << 31).is_power_of_two());
        assert!(!Token::new(0).is_power_of_two());
        assert!(!Token::new(3).is_power_of_two());
    }

    #[test]
    fn cell_data_uses_durable_json_layout() {
        let data = CellData {
            token: Some(Token::new(4)),
            grid_coord: GridCoord::new(-3, 7),
            modified: true,
        };
        let json = serde_json::to_string(&data).expect("serialize");
        assert_eq!(
            json,
            r#"{"token":{"value":4},"gridCoord":{"x":-3,"y":7},"modified":true}"#
        );

        let empty = CellData::generated(GridCoord::new(0, 0), None);
        let json = serde_json::to_string(&empty).expect("serialize");
        assert_eq!(json, r#"{"token":null,"gridCoord":{"x":0,"y":0},"modified":false}"#);
    }

    #[test]
    fn cell_data_round_trips_through_bincode() {
        assert_round_trip(&CellData::generated(GridCoord::new(5, -9), Some(Token::new(2))));
    }

    #[test]
    fn tracking_error_round_trips_through_bincode() {
        assert_round_trip(&TrackingError::TrackingAlreadyActive);
    }

    #[test]
    fn cell_view_looks_up_sorted_snapshots() {
        let snapshot = |x, y| CellSnapshot {
            data: CellData::generated(GridCoord::new(x, y), Some(Token::new(1))),
            interactive: false,
        };
        let view = CellView::from_snapshots(vec![snapshot(3, 1), snapshot(-2, 0), snapshot(0, 5)]);
        assert_eq!(view.len(), 3);
        assert!(view.contains(GridCoord::new(-2, 0)));
        assert!(view.get(GridCoord::new(1, 1)).is_none());
        let order: Vec<GridCoord> = view.iter().map(|s| s.data.grid_coord).collect();
        assert_eq!(
            order,
            vec![GridCoord::new(-2, 0), GridCoord::new(0, 5), GridCoord::new(3, 1)]
        );
    }
}
