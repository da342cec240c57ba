use std::collections::{BTreeMap, HashMap};

use super::{TileContribution, TileKey};

#[derive(Debug, Clone)]
struct Entry {
    order: u64,
    contribution: TileContribution,
}

/// Keyed store of tile contributions.
///
/// Iteration follows first-attach order: re-attaching a key replaces its
/// contribution in place, so unchanged tiles keep their relative position
/// and rebuilds stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: HashMap<TileKey, Entry>,
    by_order: BTreeMap<u64, TileKey>,
    next_order: u64,
    total_vertices: usize,
    zoom: Option<f32>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the contribution for `key`, returning the replaced one.
    pub fn attach(
        &mut self,
        key: TileKey,
        contribution: TileContribution,
        zoom: f32,
    ) -> Option<TileContribution> {
        self.zoom = Some(zoom);
        self.total_vertices += contribution.vertex_count();

        if let Some(entry) = self.tiles.get_mut(&key) {
            self.total_vertices -= entry.contribution.vertex_count();
            return Some(std::mem::replace(&mut entry.contribution, contribution));
        }

        let order = self.next_order;
        self.next_order += 1;
        self.by_order.insert(order, key.clone());
        self.tiles.insert(key, Entry { order, contribution });
        None
    }

    /// Removes the contribution for `key`. Absent keys are ignored.
    pub fn detach(&mut self, key: &TileKey) -> Option<TileContribution> {
        let entry = self.tiles.remove(key)?;
        self.by_order.remove(&entry.order);
        self.total_vertices -= entry.contribution.vertex_count();
        Some(entry.contribution)
    }

    /// True iff no attached tile has any vertex.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_vertices == 0
    }

    /// Number of attached tiles, including tiles without vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn total_vertices(&self) -> usize {
        self.total_vertices
    }

    /// Zoom level passed to the most recent `attach`.
    #[inline]
    pub fn zoom(&self) -> Option<f32> {
        self.zoom
    }

    #[inline]
    pub fn contains(&self, key: &TileKey) -> bool {
        self.tiles.contains_key(key)
    }

    pub fn get(&self, key: &TileKey) -> Option<&TileContribution> {
        self.tiles.get(key).map(|e| &e.contribution)
    }

    /// Iterates `(key, contribution)` in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&TileKey, &TileContribution)> + Clone {
        self.by_order
            .values()
            .filter_map(|key| self.tiles.get(key).map(|e| (key, &e.contribution)))
    }

    /// Iterates contributions in registry order.
    pub fn contributions(&self) -> impl Iterator<Item = &TileContribution> + Clone {
        self.iter().map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::circle_quad;
    use crate::paint::PaintArrays;
    use crate::tile::TileAddress;

    fn key(x: u32) -> TileKey {
        TileKey::new("poi", TileAddress::new(10, x, 0))
    }

    fn tile(quads: usize) -> TileContribution {
        let vertices = (0..quads).flat_map(|i| circle_quad(i as i16, 0)).collect();
        TileContribution::new(vertices, PaintArrays::new()).unwrap()
    }

    // ── membership ────────────────────────────────────────────────────────

    #[test]
    fn new_registry_is_empty() {
        let registry = TileRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.zoom(), None);
    }

    #[test]
    fn attach_then_detach_restores_empty() {
        let mut registry = TileRegistry::new();
        registry.attach(key(1), tile(2), 10.0);
        assert!(!registry.is_empty());
        assert_eq!(registry.total_vertices(), 8);

        assert!(registry.detach(&key(1)).is_some());
        assert!(registry.is_empty());
        assert!(!registry.contains(&key(1)));
    }

    #[test]
    fn tiles_without_vertices_keep_registry_empty() {
        let mut registry = TileRegistry::new();
        registry.attach(key(1), tile(0), 10.0);
        registry.attach(key(2), tile(0), 10.0);
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn detach_unknown_key_is_noop() {
        let mut registry = TileRegistry::new();
        registry.attach(key(1), tile(1), 10.0);
        assert!(registry.detach(&key(9)).is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.total_vertices(), 4);
    }

    #[test]
    fn reattach_overwrites_instead_of_duplicating() {
        let mut registry = TileRegistry::new();
        registry.attach(key(1), tile(1), 10.0);
        let old = registry.attach(key(1), tile(3), 11.0);

        assert_eq!(old.map(|c| c.quad_count()), Some(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.total_vertices(), 12);
        assert_eq!(registry.zoom(), Some(11.0));
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn iteration_follows_attach_order() {
        let mut registry = TileRegistry::new();
        for x in [5, 2, 8] {
            registry.attach(key(x), tile(1), 10.0);
        }
        let xs: Vec<u32> = registry.iter().map(|(k, _)| k.tile.x).collect();
        assert_eq!(xs, vec![5, 2, 8]);
    }

    #[test]
    fn reattach_keeps_position() {
        let mut registry = TileRegistry::new();
        for x in [5, 2, 8] {
            registry.attach(key(x), tile(1), 10.0);
        }
        registry.attach(key(5), tile(2), 10.0);
        let xs: Vec<u32> = registry.iter().map(|(k, _)| k.tile.x).collect();
        assert_eq!(xs, vec![5, 2, 8]);
    }

    #[test]
    fn detach_then_attach_moves_to_end() {
        let mut registry = TileRegistry::new();
        for x in [5, 2, 8] {
            registry.attach(key(x), tile(1), 10.0);
        }
        registry.detach(&key(5));
        registry.attach(key(5), tile(1), 10.0);
        let xs: Vec<u32> = registry.iter().map(|(k, _)| k.tile.x).collect();
        assert_eq!(xs, vec![2, 8, 5]);
    }
}
