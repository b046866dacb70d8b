use std::{collections::HashMap, fmt::Write as _};

use geocache_core::{CellSnapshot, GridCoord, Token};
use geocache_session::RenderSink;

/// Width of one rendered cell, in characters.
const CELL_WIDTH: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Handle {
    token: Option<Token>,
    interactive: bool,
}

impl Handle {
    fn from_snapshot(snapshot: &CellSnapshot) -> Self {
        Self {
            token: snapshot.data.token,
            interactive: snapshot.interactive,
        }
    }

    fn label(self) -> String {
        let value = self
            .token
            .map_or_else(|| "-".to_owned(), |token| token.value().to_string());
        if self.interactive {
            format!("[{value}]")
        } else {
            value
        }
    }
}

/// Terminal board that mirrors the live cells through render callbacks.
#[derive(Debug, Default)]
pub(crate) struct Board {
    handles: HashMap<GridCoord, Handle>,
    held: Option<Token>,
    win: Option<u32>,
}

impl Board {
    /// Takes the win announcement, if one arrived since the last call.
    pub(crate) fn take_win(&mut self) -> Option<u32> {
        self.win.take()
    }

    #[cfg(test)]
    fn label_at(&self, coord: GridCoord) -> Option<String> {
        self.handles.get(&coord).map(|handle| handle.label())
    }

    /// Draws the square of `radius` tiles around `center`, north at the top.
    ///
    /// Column and row headers are offsets from `center`, matching the
    /// arguments of the `click` command.
    pub(crate) fn render(&self, center: GridCoord, radius: i32) -> String {
        let mut text = String::new();

        let _ = write!(text, "{:>4}", "");
        for dx in -radius..=radius {
            let _ = write!(text, "{dx:^CELL_WIDTH$}");
        }
        text.push('\n');

        for dy in (-radius..=radius).rev() {
            let _ = write!(text, "{dy:>4}");
            for dx in -radius..=radius {
                let coord = GridCoord::new(center.x() + dx, center.y() + dy);
                let label = match self.handles.get(&coord) {
                    Some(handle) if dx == 0 && dy == 0 => format!("@{}", handle.label()),
                    Some(handle) => handle.label(),
                    None if dx == 0 && dy == 0 => "@".to_owned(),
                    None => ".".to_owned(),
                };
                let _ = write!(text, "{label:^CELL_WIDTH$}");
            }
            text.push('\n');
        }

        let held = self
            .held
            .map_or_else(|| "nothing".to_owned(), |token| token.value().to_string());
        let _ = write!(text, "holding: {held}");
        text
    }
}

impl RenderSink for Board {
    fn cell_shown(&mut self, cell: &CellSnapshot) {
        let _ = self
            .handles
            .insert(cell.data.grid_coord, Handle::from_snapshot(cell));
    }

    fn cell_updated(&mut self, cell: &CellSnapshot) {
        if let Some(handle) = self.handles.get_mut(&cell.data.grid_coord) {
            *handle = Handle::from_snapshot(cell);
        }
    }

    fn cell_hidden(&mut self, coord: GridCoord) {
        let _ = self.handles.remove(&coord);
    }

    fn inventory_changed(&mut self, held: Option<Token>) {
        self.held = held;
    }

    fn game_won(&mut self, value: u32) {
        self.win = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocache_core::CellData;

    fn snapshot(x: i32, y: i32, value: Option<u32>, interactive: bool) -> CellSnapshot {
        CellSnapshot {
            data: CellData::generated(GridCoord::new(x, y), value.map(Token::new)),
            interactive,
        }
    }

    #[test]
    fn handles_follow_callbacks() {
        let mut board = Board::default();
        board.cell_shown(&snapshot(1, 1, Some(2), false));
        assert_eq!(board.label_at(GridCoord::new(1, 1)).as_deref(), Some("2"));

        board.cell_updated(&snapshot(1, 1, None, true));
        assert_eq!(board.label_at(GridCoord::new(1, 1)).as_deref(), Some("[-]"));

        board.cell_hidden(GridCoord::new(1, 1));
        assert_eq!(board.label_at(GridCoord::new(1, 1)), None);
    }

    #[test]
    fn updates_for_unknown_cells_are_ignored() {
        let mut board = Board::default();
        board.cell_updated(&snapshot(0, 0, Some(1), true));
        assert_eq!(board.label_at(GridCoord::new(0, 0)), None);
    }

    #[test]
    fn renders_north_up_around_the_player() {
        let mut board = Board::default();
        board.cell_shown(&snapshot(10, 21, Some(4), true));
        board.cell_shown(&snapshot(10, 20, Some(1), true));
        board.inventory_changed(Some(Token::new(2)));

        let text = board.render(GridCoord::new(10, 20), 1);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "     -1    0    1  ");
        assert_eq!(lines[1], "   1  .   [4]   .  ");
        assert_eq!(lines[2], "   0  .  @[1]   .  ");
        assert_eq!(lines[3], "  -1  .    .    .  ");
        assert_eq!(lines[4], "holding: 2");
    }

    #[test]
    fn win_is_announced_once() {
        let mut board = Board::default();
        board.game_won(32);
        assert_eq!(board.take_win(), Some(32));
        assert_eq!(board.take_win(), None);
    }
}
