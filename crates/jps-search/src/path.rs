/// Expands a coarse jump-point chain into a full waypoint path by reinflating the bend hidden
/// inside any jump that ran diagonally for a while and then finished with an axial run.
///
/// A jump point search edge only records its two endpoints; when the movement between them is
/// neither purely diagonal nor purely axial, the implied elbow sits exactly `min(|dx|, |dy|)`
/// diagonal steps out from the parent, after which the remaining distance is covered axially.
pub fn build_path(chain: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let mut path = Vec::with_capacity(chain.len());
    let mut iter = chain.iter().copied();
    let Some(first) = iter.next() else {
        return path;
    };
    path.push(first);
    let mut parent = first;
    for child in iter {
        if let Some(bend) = mid_jump_bend(parent, child) {
            path.push(bend);
        }
        path.push(child);
        parent = child;
    }
    path
}

fn mid_jump_bend(parent: (i32, i32), child: (i32, i32)) -> Option<(i32, i32)> {
    let dx = child.0 - parent.0;
    let dy = child.1 - parent.1;
    let span = dx.abs().min(dy.abs());
    if span == 0 || span == dx.abs().max(dy.abs()) {
        return None;
    }
    Some((parent.0 + dx.signum() * span, parent.1 + dy.signum() * span))
}
