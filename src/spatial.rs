//! Sparse hash grid for radius entity queries

use crate::core::types::MonsterHandle;
use ahash::AHashMap;
use glam::Vec3;

/// Sparse hash grid over the horizontal plane
///
/// Rebuilt once per tick from arena positions. Queries are coarse: they
/// return every entity in the touched cells, and callers confirm exact
/// distances against current positions.
pub struct SpatialGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<MonsterHandle>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec3) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, handle: MonsterHandle, pos: Vec3) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(handle);
    }

    /// Rebuild the grid from scratch
    pub fn rebuild(&mut self, entities: impl Iterator<Item = (MonsterHandle, Vec3)>) {
        self.clear();
        for (handle, pos) in entities {
            self.insert(handle, pos);
        }
    }

    /// All entities whose cell lies within `radius` of `center`
    ///
    /// Over-approximates: entities up to one cell diagonal outside the
    /// radius may be included.
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<MonsterHandle> {
        let (cx, cy) = self.cell_coord(center);
        let reach = (radius / self.cell_size).ceil() as i32;

        let mut found = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                if let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) {
                    found.extend_from_slice(cell);
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn test_query_finds_nearby_entities() {
        let mut arena = Arena::new();
        let a = arena.insert(());
        let b = arena.insert(());
        let far = arena.insert(());

        let mut grid = SpatialGrid::new(32.0);
        grid.insert(a, Vec3::new(0.0, 0.0, 0.0));
        grid.insert(b, Vec3::new(20.0, 10.0, 0.0));
        grid.insert(far, Vec3::new(5000.0, 5000.0, 0.0));

        let found = grid.query_radius(Vec3::ZERO, 64.0);
        assert!(found.contains(&a));
        assert!(found.contains(&b));
        assert!(!found.contains(&far));
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut arena = Arena::new();
        let a = arena.insert(());
        let b = arena.insert(());

        let mut grid = SpatialGrid::new(32.0);
        grid.insert(a, Vec3::ZERO);
        grid.rebuild(std::iter::once((b, Vec3::ZERO)));

        let found = grid.query_radius(Vec3::ZERO, 10.0);
        assert_eq!(found, vec![b]);
    }
}
