//! Plain-text rendering of boards.

use core::fmt::{self, Write};

use alloc::string::String;

use crate::board::{BoardCell, PlayerBoard};
use crate::config::BOARD_SIZE;
use crate::game::DerivedState;
use crate::view;

impl BoardCell {
    pub fn glyph(self) -> char {
        match self {
            BoardCell::Empty => ' ',
            BoardCell::Ship => 'S',
            BoardCell::ShipSunk => 'X',
            BoardCell::ShipHit => 'I',
            BoardCell::Attempt => '?',
            BoardCell::Miss => 'O',
        }
    }
}

fn write_header(f: &mut impl Write) -> fmt::Result {
    f.write_str("   ")?;
    for x in 1..=BOARD_SIZE {
        write!(f, "{:>2}", x)?;
    }
    f.write_char('\n')
}

fn write_row(f: &mut impl Write, board: &PlayerBoard, row: usize) -> fmt::Result {
    write!(f, "{:2} |", row + 1)?;
    for cell in board.rows()[row] {
        write!(f, "{}|", cell.glyph())?;
    }
    Ok(())
}

/// Rows run along `y`, columns along `x`, both from 1.
impl fmt::Display for PlayerBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f)?;
        for row in 0..BOARD_SIZE as usize {
            write_row(f, self, row)?;
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// Both boards side by side, titled from the viewer's seat, followed by
/// the status line.
pub fn render_game(state: &DerivedState) -> String {
    const WIDTH: usize = 3 + 2 * BOARD_SIZE as usize + 4;
    let mut out = String::new();
    let left = view::left_board(state);
    let right = view::right_board(state);
    let _ = writeln!(
        out,
        "{:<width$}{}",
        view::left_board_title(state),
        view::right_board_title(state),
        width = WIDTH
    );
    let mut header = String::new();
    let _ = write_header(&mut header);
    let header = header.trim_end();
    let _ = writeln!(out, "{:<width$}{}", header, header, width = WIDTH);
    for row in 0..BOARD_SIZE as usize {
        let mut line = String::new();
        let _ = write_row(&mut line, left, row);
        let _ = write!(out, "{:<width$}", line, width = WIDTH);
        let _ = write_row(&mut out, right, row);
        out.push('\n');
    }
    out.push_str(view::status_message(state));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Coord;

    #[test]
    fn rows_follow_y_and_columns_follow_x() {
        let mut board = PlayerBoard::new();
        board.set(Coord::new(2, 1), BoardCell::Miss);
        board.set(Coord::new(1, 3), BoardCell::ShipHit);
        let text = alloc::format!("{}", board);
        let lines: alloc::vec::Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], " 1 | |O| | | | | | | | |");
        assert_eq!(lines[3], " 3 |I| | | | | | | | | |");
    }
}
