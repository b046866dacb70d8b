use geocache_core::{CellSnapshot, GeoPoint, GridCoord, Token};

/// Presentation layer notified as the session changes state.
///
/// The session never owns rendering resources. Implementations keep their
/// own handles keyed by [`GridCoord`] and release them in
/// [`RenderSink::cell_hidden`].
pub trait RenderSink {
    /// A cell entered the live set.
    fn cell_shown(&mut self, cell: &CellSnapshot);

    /// A live cell changed its token or interactivity.
    fn cell_updated(&mut self, cell: &CellSnapshot);

    /// A cell left the live set.
    fn cell_hidden(&mut self, coord: GridCoord);

    /// The inventory slot changed.
    fn inventory_changed(&mut self, held: Option<Token>);

    /// The player moved.
    fn player_moved(&mut self, _position: GeoPoint) {}

    /// The win requirement was reached.
    fn game_won(&mut self, _value: u32) {}
}

/// Sink that discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn cell_shown(&mut self, _cell: &CellSnapshot) {}

    fn cell_updated(&mut self, _cell: &CellSnapshot) {}

    fn cell_hidden(&mut self, _coord: GridCoord) {}

    fn inventory_changed(&mut self, _held: Option<Token>) {}
}
