use crate::scorer::GroupId;
use fastrand::Rng;

/// Round-robin distribution of `participants` indices into `groups` groups.
/// Deterministic; sizes differ by at most 1 from the first assignment on.
pub fn initial_assignment(participants: usize, groups: usize) -> Vec<GroupId> {
    (0..participants).map(|p| (p % groups) as GroupId).collect()
}

/// Round-robin over a shuffled participant order. Balance still holds by
/// construction; the seed decides which participants end up together, which
/// is what differentiates restart chains.
pub fn shuffled_assignment(rng: &mut Rng, participants: usize, groups: usize) -> Vec<GroupId> {
    let mut order: Vec<usize> = (0..participants).collect();
    rng.shuffle(&mut order);

    let mut assignment = vec![0 as GroupId; participants];
    for (slot, &p) in order.iter().enumerate() {
        assignment[p] = (slot % groups) as GroupId;
    }
    assignment
}

/// One random draw -> one candidate move: swap the groups of two uniformly
/// chosen participants. Returns `None` when both draws land in the same
/// group (a no-op swap); the caller counts that as a spent iteration.
/// Conditioned on `Some`, the pair is uniform over cross-group pairs.
pub fn propose_swap(rng: &mut Rng, assignment: &[GroupId]) -> Option<(usize, usize)> {
    let len = assignment.len();
    if len < 2 {
        return None;
    }
    let a = rng.usize(0..len);
    let b = rng.usize(0..len);
    if assignment[a] == assignment[b] {
        None
    } else {
        Some((a, b))
    }
}
