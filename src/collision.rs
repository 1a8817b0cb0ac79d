use crate::entities::Entity;

/// Inclusive axis-aligned overlap test.  Rectangles that only touch along an
/// edge or corner count as overlapping.
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    a.right() >= b.left() && a.left() <= b.right() && a.bottom() >= b.top() && a.top() <= b.bottom()
}

/// Index of the first obstacle touching `player`, in list order.
pub fn first_overlap(player: &Entity, obstacles: &[Entity]) -> Option<usize> {
    obstacles.iter().position(|o| overlaps(player, o))
}
