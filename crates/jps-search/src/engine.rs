use jps_grid::{natural_successors, neighborhood, octile_distance, BitGrid, Direction};
use log::{debug, trace};

use crate::pqueue::{Entry, PriorityQueue};

const NO_PARENT: u32 = u32::MAX;

/// Runs jump point search from `start` to `goal` on `grid`, returning the coarse chain of jump
/// points from start to goal (inclusive) if a path exists.
///
/// Harabor, D., & Grastien, A. (2011, August). Online graph pruning for pathfinding on grid maps.
/// In Proceedings of the AAAI Conference on Artificial Intelligence (Vol. 25, No. 1, pp. 1114-1119).
///
/// The returned chain may skip many cells between consecutive entries (a "jump"), and a single
/// jump may itself bend once from a diagonal run into an axial run; reinflating that detail into
/// a cell-by-cell path is [`crate::path`]'s job, not this one.
pub fn find_path(grid: &BitGrid, start: (i32, i32), goal: (i32, i32)) -> Option<Vec<(i32, i32)>> {
    if !grid.walkable(start.0, start.1) || !grid.walkable(goal.0, goal.1) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    debug!("find_path: start={:?} goal={:?}", start, goal);

    let len = grid.len();
    let start_pos = grid.xy_to_pos(start.0, start.1);
    let goal_pos = grid.xy_to_pos(goal.0, goal.1);

    let mut open = PriorityQueue::new(len);
    let mut closed = vec![false; len];
    let mut parent = vec![NO_PARENT; len];
    let mut g_cost = vec![i64::MAX; len];

    g_cost[start_pos] = 0;
    open.push(Entry {
        pos: start_pos,
        g: 0,
        f: octile_distance(start, goal),
        direction: None,
    });

    while let Some(current) = open.pop_min() {
        if closed[current.pos] {
            continue;
        }
        closed[current.pos] = true;
        let (x, y) = grid.pos_to_xy(current.pos);
        trace!("find_path: pop ({x}, {y}) g={} f={}", current.g, current.f);

        if current.pos == goal_pos {
            return Some(reconstruct_chain(&parent, grid, goal_pos));
        }

        let nb = neighborhood(grid, x, y);
        let successor_dirs = natural_successors(nb, current.direction);

        for dir in successor_dirs.iter() {
            let Some((nx, ny)) = jump(grid, x, y, dir, goal) else {
                continue;
            };
            let npos = grid.xy_to_pos(nx, ny);
            if closed[npos] {
                continue;
            }
            trace!("find_path: jump {:?} from ({x}, {y}) -> ({nx}, {ny})", dir);

            let step_cost = octile_distance((x, y), (nx, ny));
            let new_g = current.g + step_cost;
            if new_g < g_cost[npos] {
                g_cost[npos] = new_g;
                parent[npos] = current.pos as u32;
                let f = new_g + octile_distance((nx, ny), goal);
                if open.contains(npos) {
                    open.decrease_key(npos, new_g, f, dir);
                } else {
                    open.push(Entry { pos: npos, g: new_g, f, direction: Some(dir) });
                }
            }
        }
    }

    None
}

fn reconstruct_chain(parent: &[u32], grid: &BitGrid, goal_pos: usize) -> Vec<(i32, i32)> {
    let mut chain = Vec::new();
    let mut cur = goal_pos as u32;
    loop {
        chain.push(grid.pos_to_xy(cur as usize));
        let next = parent[cur as usize];
        if next == NO_PARENT {
            break;
        }
        cur = next;
    }
    chain.reverse();
    chain
}

/// Jumps from `(x, y)` one step into `dir` and onward until a jump point, the goal, or a dead end
/// is reached.
fn jump(grid: &BitGrid, x: i32, y: i32, dir: Direction, goal: (i32, i32)) -> Option<(i32, i32)> {
    if dir.is_diagonal() {
        jump_diagonal(grid, x, y, dir, goal)
    } else {
        jump_axial(grid, x, y, dir, goal)
    }
}

fn jump_axial(grid: &BitGrid, mut x: i32, mut y: i32, dir: Direction, goal: (i32, i32)) -> Option<(i32, i32)> {
    let (dx, dy) = dir.offset();
    loop {
        x += dx;
        y += dy;
        if !grid.walkable(x, y) {
            return None;
        }
        if (x, y) == goal {
            return Some((x, y));
        }
        let succ = natural_successors(neighborhood(grid, x, y), Some(dir));
        if !succ.contains(dir) {
            return None;
        }
        if succ != enumset::EnumSet::only(dir) {
            return Some((x, y));
        }
    }
}

fn jump_diagonal(grid: &BitGrid, mut x: i32, mut y: i32, dir: Direction, goal: (i32, i32)) -> Option<(i32, i32)> {
    let (dx, dy) = dir.offset();
    let (left, right) = dir.axial_components();
    loop {
        x += dx;
        y += dy;
        if !grid.walkable(x, y) {
            return None;
        }
        if (x, y) == goal {
            return Some((x, y));
        }
        if let Some(jp) = jump_axial(grid, x, y, left, goal) {
            return Some(jp);
        }
        if let Some(jp) = jump_axial(grid, x, y, right, goal) {
            return Some(jp);
        }
        let succ = natural_successors(neighborhood(grid, x, y), Some(dir));
        if !succ.contains(dir) {
            return None;
        }
        let natural = enumset::EnumSet::only(dir) | left | right;
        if succ != (succ & natural) {
            return Some((x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_on_open_grid() {
        let grid = BitGrid::new(10, 10);
        let path = find_path(&grid, (0, 0), (5, 0)).unwrap();
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(5, 0)));
    }

    #[test]
    fn pure_diagonal_on_open_grid() {
        let grid = BitGrid::new(10, 10);
        let path = find_path(&grid, (0, 0), (5, 5)).unwrap();
        assert_eq!(path.last(), Some(&(5, 5)));
    }

    #[test]
    fn routes_around_a_single_obstacle() {
        let mut grid = BitGrid::new(10, 10);
        grid.set(5, 0, false);
        let path = find_path(&grid, (0, 0), (9, 0)).unwrap();
        assert_eq!(path.last(), Some(&(9, 0)));
        assert!(path.len() > 2);
    }

    #[test]
    fn finds_the_gap_in_a_wall() {
        let mut grid = BitGrid::new(7, 7);
        for y in 0..7 {
            grid.set(3, y, false);
        }
        grid.set(3, 3, true);
        let path = find_path(&grid, (0, 0), (6, 6)).unwrap();
        assert_eq!(path.last(), Some(&(6, 6)));
    }

    #[test]
    fn no_path_through_a_sealed_wall() {
        let mut grid = BitGrid::new(7, 7);
        for y in 0..7 {
            grid.set(3, y, false);
        }
        assert!(find_path(&grid, (0, 0), (6, 6)).is_none());
    }

    #[test]
    fn refuses_to_cut_a_blocked_corner() {
        let mut grid = BitGrid::new(3, 3);
        grid.set(1, 0, false);
        grid.set(0, 1, false);
        assert!(find_path(&grid, (0, 0), (1, 1)).is_none());
    }

    #[test]
    fn start_equals_goal_is_a_trivial_path() {
        let grid = BitGrid::new(5, 5);
        assert_eq!(find_path(&grid, (2, 2), (2, 2)), Some(vec![(2, 2)]));
    }
}
