use crate::BitGrid;

/// Labels every walkable cell of `grid` with a 4-connected component id (1-based; `0` means
/// blocked/unlabelled). Two cells with different ids cannot be connected by any path.
///
/// The reference implementation this crate was distilled from used native recursion per cell,
/// which overflows the stack on large open maps; this instead walks an explicit stack, matching
/// the teacher's general practice of writing grid scans as loops rather than deep recursion.
pub fn label_components(grid: &BitGrid) -> Vec<u32> {
    let len = grid.len();
    let mut labels = vec![0u32; len];
    let mut stack = Vec::new();
    let mut next_label = 0u32;

    for start_pos in 0..len {
        if labels[start_pos] != 0 || !grid.walkable_pos(start_pos) {
            continue;
        }

        next_label += 1;
        labels[start_pos] = next_label;
        stack.push(start_pos);

        while let Some(pos) = stack.pop() {
            let (x, y) = grid.pos_to_xy(pos);
            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let (nx, ny) = (x + dx, y + dy);
                if !grid.walkable(nx, ny) {
                    continue;
                }
                let npos = grid.xy_to_pos(nx, ny);
                if labels[npos] == 0 {
                    labels[npos] = next_label;
                    stack.push(npos);
                }
            }
        }
    }

    labels
}
