use enumset::{EnumSet, EnumSetType};

use crate::BitGrid;

/// One of eight compass directions, numbered clockwise from north as drawn in the design doc:
///
/// ```text
/// 7 0 1
/// 6 . 2
/// 5 4 3
/// ```
///
/// Even variants are axial (straight) moves; odd variants are diagonal moves.
#[derive(EnumSetType, Debug)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    #[inline]
    pub fn is_diagonal(self) -> bool {
        (self as u8) % 2 == 1
    }

    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        Self::from_index((self as u8 + 4) % 8)
    }

    /// For a diagonal direction, the two axial directions it is composed of (counterclockwise
    /// component first), e.g. `NorthEast -> (North, East)`.
    #[inline]
    pub fn axial_components(self) -> (Direction, Direction) {
        debug_assert!(self.is_diagonal());
        (
            Self::from_index((self as u8 + 7) % 8),
            Self::from_index((self as u8 + 1) % 8),
        )
    }

    #[inline]
    fn from_index(i: u8) -> Direction {
        Direction::ALL[i as usize]
    }
}

/// The walkability of the eight cells around `(x, y)`, as a direction set.
pub fn neighborhood(grid: &BitGrid, x: i32, y: i32) -> EnumSet<Direction> {
    let mut nb = EnumSet::empty();
    for dir in Direction::ALL {
        let (dx, dy) = dir.offset();
        if grid.walkable(x + dx, y + dy) {
            nb |= dir;
        }
    }
    nb
}

/// Computes the set of directions that must be explored from a cell whose neighborhood (the
/// walkability of its eight surrounding cells) is `nb`, having arrived from direction `arrival`
/// (`None` for the start node, which explores every direction).
///
/// This folds together the "natural successor" and "forced neighbor" rules of jump point search:
/// for axial arrival, the forward cell is always a successor, and a side cell's diagonal is a
/// forced successor when that side is open but the cell diagonally behind it is blocked (the
/// straight-line path from the parent could not otherwise reach past the obstacle). For diagonal
/// arrival, both axial components and the diagonal itself are natural successors, gated by the
/// no-corner-cutting rule that both flanking axial cells must be open before the diagonal cell
/// itself is considered; forced neighbors arise symmetrically behind each axial component.
pub fn natural_successors(nb: EnumSet<Direction>, arrival: Option<Direction>) -> EnumSet<Direction> {
    use Direction::*;

    const N: u8 = 1 << North as usize;
    const NE: u8 = 1 << NorthEast as usize;
    const E: u8 = 1 << East as usize;
    const SE: u8 = 1 << SouthEast as usize;
    const S: u8 = 1 << South as usize;
    const SW: u8 = 1 << SouthWest as usize;
    const W: u8 = 1 << West as usize;
    const NW: u8 = 1 << NorthWest as usize;

    // `ortho_successors` builds the successor table for an axial arrival direction `f`, where
    // `fl`/`fr` are the forward-left/forward-right diagonals and `l`/`r` are the left/right axial
    // side cells.
    const fn ortho_successors(f: u8, fl: u8, l: u8, fr: u8, r: u8) -> [u8; 256] {
        let mut table = [0u8; 256];
        let mut nb = 0usize;
        while nb < 256 {
            let n = nb as u8;
            if n & f != 0 {
                table[nb] |= f;
            }
            // left side blocked, forward-left open -> forward-left is forced
            if n & (l | fl) == fl {
                table[nb] |= fl;
            }
            // right side blocked, forward-right open -> forward-right is forced
            if n & (r | fr) == fr {
                table[nb] |= fr;
            }
            nb += 1;
        }
        table
    }

    // `diagonal_successors` builds the table for a diagonal arrival `f`, composed of axial
    // directions `l` (counterclockwise component) and `r` (clockwise component). Both components
    // are natural successors when open; the diagonal itself is a natural successor only when
    // both flanks and the diagonal cell are open (no corner cutting). A forced neighbor appears
    // on the far side of each component exactly as in the axial case: `outer_l` (the diagonal
    // beyond `l`, away from `f`) is forced when `l` is open but `behind_r` (the axial directly
    // behind `r`) is blocked, and symmetrically for `outer_r`.
    const fn diagonal_successors(
        f: u8,
        l: u8,
        r: u8,
        outer_l: u8,
        behind_r: u8,
        outer_r: u8,
        behind_l: u8,
    ) -> [u8; 256] {
        let mut table = [0u8; 256];
        let mut nb = 0usize;
        while nb < 256 {
            let n = nb as u8;
            if n & l != 0 {
                table[nb] |= l;
            }
            if n & r != 0 {
                table[nb] |= r;
            }
            if n & (l | r | f) == l | r | f {
                table[nb] |= f;
            }
            if n & (behind_r | l) == l {
                table[nb] |= outer_l;
            }
            if n & (behind_l | r) == r {
                table[nb] |= outer_r;
            }
            nb += 1;
        }
        table
    }

    static TABLES: [[u8; 256]; 8] = [
        ortho_successors(N, NW, W, NE, E),
        diagonal_successors(NE, N, E, NW, W, SE, S),
        ortho_successors(E, NE, N, SE, S),
        diagonal_successors(SE, E, S, NE, N, SW, W),
        ortho_successors(S, SE, E, SW, W),
        diagonal_successors(SW, S, W, SE, E, NW, N),
        ortho_successors(W, SW, S, NW, N),
        diagonal_successors(NW, W, N, SW, S, NE, E),
    ];

    // The start node explores every open axial direction unconditionally, and an open diagonal
    // only when both of its flanking axials are also open (the same no-corner-cutting rule
    // diagonal travel is always subject to).
    const START: [u8; 256] = {
        let mut table = [0u8; 256];
        let mut nb = 0usize;
        while nb < 256 {
            let n = nb as u8;
            if n & N != 0 {
                table[nb] |= N;
            }
            if n & E != 0 {
                table[nb] |= E;
            }
            if n & S != 0 {
                table[nb] |= S;
            }
            if n & W != 0 {
                table[nb] |= W;
            }
            if n & (N | E | NE) == N | E | NE {
                table[nb] |= NE;
            }
            if n & (S | E | SE) == S | E | SE {
                table[nb] |= SE;
            }
            if n & (S | W | SW) == S | W | SW {
                table[nb] |= SW;
            }
            if n & (N | W | NW) == N | W | NW {
                table[nb] |= NW;
            }
            nb += 1;
        }
        table
    };

    let table = match arrival {
        Some(d) => &TABLES[d as usize],
        None => &START,
    };
    EnumSet::from_u8(table[nb.as_u8() as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axial_components_of_northeast() {
        assert_eq!(Direction::NorthEast.axial_components(), (Direction::North, Direction::East));
    }

    #[test]
    fn start_node_explores_everything_when_unobstructed() {
        let nb = EnumSet::all();
        assert_eq!(natural_successors(nb, None), EnumSet::all());
    }

    #[test]
    fn start_node_forbids_cutting_a_blocked_corner() {
        // Both axials flanking northeast are blocked: moving NE from the start would cut the
        // corner even though the diagonal cell itself happens to be open.
        let nb = EnumSet::all() - Direction::North - Direction::East;
        assert!(!natural_successors(nb, None).contains(Direction::NorthEast));
    }

    #[test]
    fn axial_forward_always_natural_when_open() {
        let nb = Direction::North.into();
        assert!(natural_successors(nb, Some(Direction::North)).contains(Direction::North));
    }

    #[test]
    fn forced_neighbor_behind_blocked_side() {
        // Travelling north; west is blocked but northwest is open -> northwest is forced.
        let nb = Direction::North | Direction::NorthWest;
        let succ = natural_successors(nb, Some(Direction::North));
        assert!(succ.contains(Direction::NorthWest));
    }

    #[test]
    fn no_forced_neighbor_when_behind_side_open() {
        // West is open, so travelling through it is never cut off -> northwest isn't forced.
        let nb = Direction::North | Direction::West | Direction::NorthWest;
        let succ = natural_successors(nb, Some(Direction::North));
        assert!(!succ.contains(Direction::NorthWest));
    }

    #[test]
    fn diagonal_forward_requires_both_flanks() {
        let nb = Direction::North | Direction::NorthEast;
        // East flank missing: corner would be cut, NE must not be a natural successor.
        let succ = natural_successors(nb, Some(Direction::NorthEast));
        assert!(!succ.contains(Direction::NorthEast));
    }

    #[test]
    fn diagonal_forced_neighbor_on_far_side() {
        // Travelling NE; north component open but west is blocked -> northwest is forced.
        let nb = Direction::North | Direction::East | Direction::NorthWest;
        let succ = natural_successors(nb, Some(Direction::NorthEast));
        assert!(succ.contains(Direction::NorthWest));
    }

    #[test]
    fn diagonal_no_forced_neighbor_when_far_side_open() {
        let nb = Direction::North | Direction::East | Direction::West | Direction::NorthWest;
        let succ = natural_successors(nb, Some(Direction::NorthEast));
        assert!(!succ.contains(Direction::NorthWest));
    }
}
