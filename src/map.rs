use std::fmt::Write as _;

use jps_grid::{label_components, BitGrid};
use log::{debug, warn};

use crate::MapError;

/// A grid-based navigation map: walkable/blocked cell storage plus the jump point search,
/// path reconstruction, and line-of-sight smoothing passes built on top of it.
///
/// A `Map` owns its grid store and, once [`Map::mark_connected`] has been called, a cached
/// component labelling used to reject unreachable queries without running a search. Both are
/// invalidated by any call that mutates the grid.
pub struct Map {
    grid: BitGrid,
    components: Option<Vec<u32>>,
}

impl Map {
    /// Creates an empty (fully walkable) map of the given size.
    pub fn new(width: i32, height: i32) -> Result<Self, MapError> {
        if width <= 0 || height <= 0 {
            return Err(MapError::ConfigInvalid { reason: "width and height must both be positive" });
        }
        Ok(Map { grid: BitGrid::new(width, height), components: None })
    }

    /// Creates a map of the given size with an initial set of obstacles already blocked.
    pub fn with_obstacles(
        width: i32,
        height: i32,
        obstacles: impl IntoIterator<Item = (i32, i32)>,
    ) -> Result<Self, MapError> {
        let mut map = Self::new(width, height)?;
        map.add_blockset(obstacles)?;
        Ok(map)
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Marks a single cell blocked.
    pub fn add_block(&mut self, x: i32, y: i32) -> Result<(), MapError> {
        self.set_walkable(x, y, false)
    }

    /// Marks every cell in `cells` blocked.
    pub fn add_blockset(&mut self, cells: impl IntoIterator<Item = (i32, i32)>) -> Result<(), MapError> {
        for (x, y) in cells {
            self.add_block(x, y)?;
        }
        Ok(())
    }

    /// Marks a single cell walkable again.
    pub fn clear_block(&mut self, x: i32, y: i32) -> Result<(), MapError> {
        self.set_walkable(x, y, true)
    }

    /// Clears every obstacle, returning the map to fully walkable.
    pub fn clear_all_blocks(&mut self) {
        self.grid.clear_all();
        self.components = None;
    }

    fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) -> Result<(), MapError> {
        if !self.grid.in_bounds(x, y) {
            warn!("set_walkable: ({x}, {y}) is out of bounds for a {}x{} map", self.width(), self.height());
            return Err(MapError::OutOfBounds { x, y, width: self.width(), height: self.height() });
        }
        self.grid.set(x, y, walkable);
        self.components = None;
        Ok(())
    }

    /// Labels every walkable cell with its 4-connected component id, enabling `find_path` to
    /// reject an unreachable query without running a search. Invalidated by any subsequent
    /// obstacle mutation.
    pub fn mark_connected(&mut self) {
        self.components = Some(label_components(&self.grid));
    }

    fn validate_endpoint(&self, x: i32, y: i32) -> Result<(), MapError> {
        if !self.grid.in_bounds(x, y) {
            return Err(MapError::OutOfBounds { x, y, width: self.width(), height: self.height() });
        }
        if !self.grid.walkable(x, y) {
            return Err(MapError::BlockedEndpoint { x, y });
        }
        Ok(())
    }

    fn components_agree(&self, start: (i32, i32), end: (i32, i32)) -> bool {
        match &self.components {
            Some(components) => {
                let s = components[self.grid.xy_to_pos(start.0, start.1)];
                let e = components[self.grid.xy_to_pos(end.0, end.1)];
                s == e
            }
            None => true,
        }
    }

    /// Finds a smoothed path between two integer grid cells.
    ///
    /// Returns an empty list (not an error) when no path exists.
    pub fn find_path_by_grid(&self, start: (i32, i32), end: (i32, i32)) -> Result<Vec<(i32, i32)>, MapError> {
        self.validate_endpoint(start.0, start.1)?;
        self.validate_endpoint(end.0, end.1)?;

        if start == end {
            debug!("find_path_by_grid: start={:?} end={:?} found=true (trivial)", start, end);
            return Ok(vec![start]);
        }

        if !self.components_agree(start, end) {
            debug!("find_path_by_grid: start={:?} end={:?} found=false (disconnected)", start, end);
            return Ok(Vec::new());
        }

        let chain = jps_search::find_path(&self.grid, start, end);
        debug!("find_path_by_grid: start={:?} end={:?} found={}", start, end, chain.is_some());

        let Some(chain) = chain else {
            return Ok(Vec::new());
        };
        let waypoints = jps_search::build_path(&chain);
        Ok(jps_search::smooth_path(&self.grid, &waypoints))
    }

    /// Finds a smoothed path between two fractional points, following §6's bend injection rule:
    /// if the smoothed integer path doesn't keep line of sight from `start`/`end` to their
    /// nearest interior waypoint, an integer bend point is inserted to restore it.
    pub fn find_path(&self, start: (f64, f64), end: (f64, f64)) -> Result<Vec<(f64, f64)>, MapError> {
        let start_cell = (start.0.floor() as i32, start.1.floor() as i32);
        let end_cell = (end.0.floor() as i32, end.1.floor() as i32);

        let integer_path = self.find_path_by_grid(start_cell, end_cell)?;
        if integer_path.is_empty() {
            return Ok(Vec::new());
        }
        if integer_path.len() == 1 {
            return Ok(if start == end { vec![start] } else { vec![start, end] });
        }

        let mut interior: Vec<(f64, f64)> =
            integer_path[1..integer_path.len() - 1].iter().map(|&(x, y)| (x as f64, y as f64)).collect();

        if let Some(&second) = interior.first() {
            if !jps_search::segment_is_walkable(&self.grid, start, second) {
                interior.insert(0, fractional_bend(start, second));
            }
        } else if !jps_search::segment_is_walkable(&self.grid, start, end) {
            interior.push(fractional_bend(start, end));
        }

        if let Some(&penultimate) = interior.last() {
            if !jps_search::segment_is_walkable(&self.grid, penultimate, end) {
                interior.push(fractional_bend(end, penultimate));
            }
        }

        let mut result = Vec::with_capacity(interior.len() + 2);
        result.push(start);
        result.extend(interior);
        result.push(end);
        Ok(result)
    }

    /// Tests whether a straight segment between two (possibly fractional) points stays within
    /// walkable cells the whole way.
    pub fn check_line_walkable(&self, from: (f64, f64), to: (f64, f64)) -> bool {
        jps_search::segment_is_walkable(&self.grid, from, to)
    }

    /// Renders the walkable/blocked grid as `.`/`*` rows, origin top-left.
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity((self.width() as usize + 1) * self.height() as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(if self.grid.walkable(x, y) { '.' } else { '*' });
            }
            out.push('\n');
        }
        out
    }

    /// Renders the cached component labelling as space-separated ids (`*` for blocked cells),
    /// one row per line. Empty if [`Map::mark_connected`] hasn't been called.
    pub fn dump_connected(&self) -> String {
        let Some(components) = &self.components else {
            return String::new();
        };
        let mut out = String::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let pos = self.grid.xy_to_pos(x, y);
                if components[pos] > 0 {
                    let _ = write!(out, "{} ", components[pos]);
                } else {
                    out.push_str("* ");
                }
            }
            out.push('\n');
        }
        out
    }
}

fn fractional_bend(from: (f64, f64), towards: (f64, f64)) -> (f64, f64) {
    let bend_axis = |from: f64, towards: f64| if towards >= from { from.ceil() } else { from.floor() };
    (bend_axis(from.0, towards.0), bend_axis(from.1, towards.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(Map::new(0, 5).is_err());
        assert!(Map::new(5, -1).is_err());
    }

    #[test]
    fn with_obstacles_blocks_every_cell_up_front() {
        let map = Map::with_obstacles(3, 3, [(0, 0), (2, 2)]).unwrap();
        assert_eq!(map.dump(), "*..\n...\n..*\n");
    }

    #[test]
    fn add_block_out_of_bounds_is_an_error() {
        let mut map = Map::new(3, 3).unwrap();
        assert_eq!(
            map.add_block(10, 0),
            Err(MapError::OutOfBounds { x: 10, y: 0, width: 3, height: 3 })
        );
    }

    #[test]
    fn find_path_by_grid_rejects_blocked_endpoints() {
        let mut map = Map::new(3, 3).unwrap();
        map.add_block(1, 1).unwrap();
        assert_eq!(map.find_path_by_grid((1, 1), (2, 2)), Err(MapError::BlockedEndpoint { x: 1, y: 1 }));
    }

    #[test]
    fn straight_line_scenario() {
        let map = Map::new(5, 1).unwrap();
        let path = map.find_path_by_grid((0, 0), (4, 0)).unwrap();
        assert_eq!(path, vec![(0, 0), (4, 0)]);
    }

    #[test]
    fn diagonal_scenario() {
        let map = Map::new(5, 5).unwrap();
        let path = map.find_path_by_grid((0, 0), (4, 4)).unwrap();
        assert_eq!(path, vec![(0, 0), (4, 4)]);
    }

    #[test]
    fn wall_with_gap_scenario() {
        let mut map = Map::new(7, 5).unwrap();
        for y in 0..5 {
            map.add_block(3, y).unwrap();
        }
        map.clear_block(3, 2).unwrap();
        let path = map.find_path_by_grid((0, 2), (6, 2)).unwrap();
        assert_eq!(path, vec![(0, 2), (3, 2), (6, 2)]);
    }

    #[test]
    fn unreachable_scenario_returns_empty() {
        let mut map = Map::new(5, 5).unwrap();
        for y in 0..5 {
            map.add_block(2, y).unwrap();
        }
        assert_eq!(map.find_path_by_grid((0, 0), (4, 0)).unwrap(), Vec::new());
    }

    #[test]
    fn corner_cut_forbidden_scenario() {
        let mut map = Map::new(3, 3).unwrap();
        map.add_block(1, 0).unwrap();
        map.add_block(0, 1).unwrap();
        assert_eq!(map.find_path_by_grid((0, 0), (1, 1)).unwrap(), Vec::new());
    }

    #[test]
    fn mark_connected_short_circuits_a_disconnected_query() {
        let mut map = Map::new(5, 5).unwrap();
        for y in 0..5 {
            map.add_block(2, y).unwrap();
        }
        map.mark_connected();
        assert_eq!(map.find_path_by_grid((0, 0), (4, 0)).unwrap(), Vec::new());
    }

    #[test]
    fn fractional_endpoints_scenario() {
        let map = Map::new(5, 5).unwrap();
        let path = map.find_path((0.2, 0.2), (4.8, 4.8)).unwrap();
        assert_eq!(path.first(), Some(&(0.2, 0.2)));
        assert_eq!(path.last(), Some(&(4.8, 4.8)));
        for pair in path.windows(2) {
            assert!(map.check_line_walkable(pair[0], pair[1]));
        }
    }

    #[test]
    fn start_equals_end_is_a_single_element_path() {
        let map = Map::new(5, 5).unwrap();
        assert_eq!(map.find_path_by_grid((2, 2), (2, 2)).unwrap(), vec![(2, 2)]);
    }

    #[test]
    fn dump_renders_obstacles() {
        let mut map = Map::new(3, 2).unwrap();
        map.add_block(1, 0).unwrap();
        assert_eq!(map.dump(), ".*.\n...\n");
    }

    #[test]
    fn dump_connected_is_empty_until_marked() {
        let map = Map::new(2, 2).unwrap();
        assert_eq!(map.dump_connected(), String::new());
    }
}
