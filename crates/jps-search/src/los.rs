use jps_grid::BitGrid;

/// Reduces a waypoint path to the shortest sequence of turns that stays within line of sight of
/// the grid, by greedily pulling each anchor forward to the furthest later waypoint it can see
/// directly.
///
/// This is the "string pulling" pass applied after [`crate::path::build_path`]: jump point search
/// already returns an optimal-cost path, but its waypoints sit at grid-forced turns, which are
/// often visually unnecessary once the path is walked by something that isn't confined to the
/// grid's axes.
pub fn smooth_path(grid: &BitGrid, waypoints: &[(i32, i32)]) -> Vec<(i32, i32)> {
    if waypoints.len() <= 2 {
        return waypoints.to_vec();
    }

    let mut smoothed = vec![waypoints[0]];
    let mut anchor = 0;
    while anchor < waypoints.len() - 1 {
        let mut furthest = anchor + 1;
        for candidate in (anchor + 2..waypoints.len()).rev() {
            if segment_is_walkable(grid, as_f64(waypoints[anchor]), as_f64(waypoints[candidate])) {
                furthest = candidate;
                break;
            }
        }
        smoothed.push(waypoints[furthest]);
        anchor = furthest;
    }
    smoothed
}

fn as_f64(p: (i32, i32)) -> (f64, f64) {
    (p.0 as f64, p.1 as f64)
}

/// Tests whether every grid cell the segment from `from` to `to` passes over is walkable.
///
/// Scans both axes independently (once interpolating y from x, once interpolating x from y)
/// rather than tracing a single Bresenham line, so that a cell a thin diagonal line grazes past
/// without ever landing on exactly can't hide behind the other axis's rounding. Endpoints may be
/// fractional, so callers checking line of sight between cell centers and sub-cell positions
/// (e.g. fractional path endpoints) share this same scan.
pub fn segment_is_walkable(grid: &BitGrid, from: (f64, f64), to: (f64, f64)) -> bool {
    let (x1, y1) = from;
    let (x2, y2) = to;

    // The cell containing coordinate `c` is `floor(c)`, never `ceil(c)`: a bound taken from the
    // far endpoint's `ceil` would probe one column/row past the segment's actual extent.
    if x1 == x2 {
        let (lo, hi) = (y1.min(y2).floor() as i32, y1.max(y2).floor() as i32);
        return (lo..=hi).all(|y| grid.walkable(x1.floor() as i32, y));
    }

    let dx = x2 - x1;
    let dy = y2 - y1;
    let slope = dy / dx;

    let (min_x, max_x) = (x1.min(x2).floor() as i32, x1.max(x2).floor() as i32);
    for x in min_x..=max_x {
        let y = y1 + slope * (x as f64 - x1);
        if !grid.walkable(x, y.floor() as i32) {
            return false;
        }
    }

    if dy == 0.0 {
        // The x-major scan above already walked every cell on a horizontal line exactly.
        return true;
    }

    // The bound here follows y1 vs y2, not x1 vs x2: using the wrong pair of endpoints here
    // would scan past the segment's actual extent on maps where the line is steeper than 45
    // degrees.
    let (min_y, max_y) = (y1.min(y2).floor() as i32, y1.max(y2).floor() as i32);
    for y in min_y..=max_y {
        let x = x1 + (y as f64 - y1) / slope;
        if !grid.walkable(x.floor() as i32, y) {
            return false;
        }
    }

    true
}
