//! Entity storage
//!
//! Pools are unordered: order only affects draw z-order inside a frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Growable pool of live entities with O(1) removal by index.
///
/// `remove` swaps the last entity into the hole, so scanning indices from
/// high to low and removing the current one never skips or revisits another
/// live entity (the swapped-in entity has already been visited).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, item: T) {
        self.items.push(item);
    }

    /// Retire the entity at `index` and return it
    pub fn remove(&mut self, index: usize) -> T {
        self.items.swap_remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Every live entity
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> std::ops::Index<usize> for Pool<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> std::ops::IndexMut<usize> for Pool<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Fixed-capacity history of recent positions, newest first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trail<const N: usize> {
    #[serde(with = "trail_points")]
    points: [Vec2; N],
}

impl<const N: usize> Trail<N> {
    /// Trail with every slot at `pos`
    pub fn filled(pos: Vec2) -> Self {
        Self { points: [pos; N] }
    }

    /// Record `pos` as newest, dropping the oldest
    pub fn push_front(&mut self, pos: Vec2) {
        self.points.rotate_right(1);
        self.points[0] = pos;
    }

    pub fn newest(&self) -> Vec2 {
        self.points[0]
    }

    /// Oldest retained point - where the rendered streak starts
    pub fn oldest(&self) -> Vec2 {
        self.points[N - 1]
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// serde has no const-generic array impls, go through a Vec
mod trail_points {
    use glam::Vec2;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        points: &[Vec2; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        points.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[Vec2; N], D::Error> {
        let points = Vec::<Vec2>::deserialize(deserializer)?;
        let len = points.len();
        points
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"a full trail"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_scan_removal_visits_each_once() {
        let mut pool = Pool::new();
        for i in 0..10 {
            pool.insert(i);
        }

        let mut visited = Vec::new();
        let mut i = pool.len();
        while i > 0 {
            i -= 1;
            let value = pool[i];
            visited.push(value);
            if value % 3 == 0 {
                pool.remove(i);
            }
        }

        visited.sort();
        assert_eq!(visited, (0..10).collect::<Vec<_>>());
        let mut left: Vec<_> = pool.iter().copied().collect();
        left.sort();
        assert_eq!(left, vec![1, 2, 4, 5, 7, 8]);
    }

    #[test]
    fn test_trail_newest_first() {
        let mut trail = Trail::<3>::filled(Vec2::ZERO);
        assert_eq!(trail.oldest(), Vec2::ZERO);

        trail.push_front(Vec2::new(1.0, 0.0));
        trail.push_front(Vec2::new(2.0, 0.0));
        assert_eq!(trail.newest(), Vec2::new(2.0, 0.0));
        assert_eq!(trail.oldest(), Vec2::ZERO);

        trail.push_front(Vec2::new(3.0, 0.0));
        assert_eq!(trail.oldest(), Vec2::new(1.0, 0.0));
        assert_eq!(trail.points().len(), 3);
    }

    #[test]
    fn test_trail_serde() {
        let mut trail = Trail::<6>::filled(Vec2::new(4.0, 5.0));
        trail.push_front(Vec2::new(1.0, 1.0));
        let json = serde_json::to_string(&trail).unwrap();
        let back: Trail<6> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trail);

        let short = r#"{"points":[[1.0,2.0]]}"#;
        assert!(serde_json::from_str::<Trail<6>>(short).is_err());
    }
}
