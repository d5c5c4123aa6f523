// Copyright 2026 the HexTanks client authors
//
// This file is part of the HexTanks client.
//
// The HexTanks client is free software: you can redistribute it and/or
// modify it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// The HexTanks client is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero
// General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with the HexTanks client. If not, see <https://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Cube-coordinate hex arithmetic and the precomputed reachability table

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A position on the hex board in cube coordinates
///
/// Invariant: `x + y + z == 0`. Serializes as `{"x":i,"y":j,"z":k}`, the
/// wire encoding for hexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CubePosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubePosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert_eq!(x + y + z, 0, "cube coordinates must sum to zero");
        Self { x, y, z }
    }

    /// Number of single-hex steps between two positions
    pub fn distance_to(self, other: Self) -> u32 {
        (self - other).norm()
    }

    /// Whether the position lies on a board of the given size
    pub fn in_bounds(self, size: i32) -> bool {
        self.x.abs() < size && self.y.abs() < size && self.z.abs() < size
    }
}

impl Add<CubeOffset> for CubePosition {
    type Output = Self;

    fn add(self, rhs: CubeOffset) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}
impl AddAssign<CubeOffset> for CubePosition {
    fn add_assign(&mut self, rhs: CubeOffset) {
        *self = *self + rhs;
    }
}
impl Sub for CubePosition {
    type Output = CubeOffset;

    fn sub(self, rhs: Self) -> CubeOffset {
        CubeOffset {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}
impl Sub<CubeOffset> for CubePosition {
    type Output = Self;

    fn sub(self, rhs: CubeOffset) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}
impl SubAssign<CubeOffset> for CubePosition {
    fn sub_assign(&mut self, rhs: CubeOffset) {
        *self = *self - rhs;
    }
}

/// A displacement between two hex positions
///
/// Same invariant as [`CubePosition`]: components sum to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CubeOffset {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeOffset {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert_eq!(x + y + z, 0, "cube coordinates must sum to zero");
        Self { x, y, z }
    }

    /// Length of the displacement in hex steps
    pub fn norm(self) -> u32 {
        ((self.x.abs() + self.y.abs() + self.z.abs()) / 2) as u32
    }
}

impl Add for CubeOffset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}
impl Mul<i32> for CubeOffset {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}
impl Neg for CubeOffset {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// The six axial unit directions: the permutations of `{-1, 0, +1}` that
/// sum to zero
pub const DIRECTIONS: [CubeOffset; 6] = [
    CubeOffset { x: -1, y: 0, z: 1 },
    CubeOffset { x: -1, y: 1, z: 0 },
    CubeOffset { x: 0, y: -1, z: 1 },
    CubeOffset { x: 0, y: 1, z: -1 },
    CubeOffset { x: 1, y: -1, z: 0 },
    CubeOffset { x: 1, y: 0, z: -1 },
];

/// Predecessor table for breadth-first reachability queries
///
/// `ring(d)` maps every offset reachable in exactly `d` hex-steps from the
/// origin to the set of offsets at distance `d - 1` it can be stepped into
/// from. `ring(0)` holds only the origin, reachable from itself. Every
/// "reachable through traversable terrain" query walks this table instead of
/// re-running a neighbourhood search.
pub struct PathingOffsets {
    rings: Vec<BTreeMap<CubeOffset, BTreeSet<CubeOffset>>>,
}

impl PathingOffsets {
    pub fn new(max_distance: u32) -> Self {
        let origin = CubeOffset::new(0, 0, 0);
        let mut visited = HashSet::new();
        visited.insert(origin);

        let mut rings = Vec::with_capacity(max_distance as usize + 1);
        rings.push(BTreeMap::from([(origin, BTreeSet::from([origin]))]));

        for distance in 1..=max_distance as usize {
            let mut ring = BTreeMap::<CubeOffset, BTreeSet<CubeOffset>>::new();
            let previous: Vec<CubeOffset> = rings[distance - 1].keys().copied().collect();
            for source in previous {
                for direction in DIRECTIONS {
                    let next = source + direction;
                    if visited.insert(next) {
                        // first discovery: the discoverer is the sole predecessor
                        ring.insert(next, BTreeSet::from([source]));
                    } else if let Some(sources) = ring.get_mut(&next) {
                        // rediscovered at the same distance: one more way in
                        sources.insert(source);
                    }
                }
            }
            rings.push(ring);
        }

        Self { rings }
    }

    pub fn max_distance(&self) -> u32 {
        (self.rings.len() - 1) as u32
    }

    /// Offsets at exactly `distance` steps, with their predecessor sets
    pub fn ring(&self, distance: u32) -> &BTreeMap<CubeOffset, BTreeSet<CubeOffset>> {
        &self.rings[distance as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_are_the_zero_sum_permutations() {
        assert_eq!(DIRECTIONS.len(), 6);
        for direction in DIRECTIONS {
            assert_eq!(direction.x + direction.y + direction.z, 0);
            assert_eq!(direction.norm(), 1);
        }
        let unique: BTreeSet<_> = DIRECTIONS.into_iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn distance_is_half_the_component_sum() {
        let a = CubePosition::new(0, 0, 0);
        let b = CubePosition::new(2, -1, -1);
        assert_eq!(a.distance_to(b), 2);
        assert_eq!(b.distance_to(a), 2);
        assert_eq!(a.distance_to(a), 0);
        assert_eq!(a.distance_to(CubePosition::new(3, 0, -3)), 3);
    }

    #[test]
    fn bounds_are_strict_on_every_axis() {
        assert!(CubePosition::new(10, -10, 0).in_bounds(11));
        assert!(!CubePosition::new(11, -11, 0).in_bounds(11));
        assert!(!CubePosition::new(5, 6, -11).in_bounds(11));
    }

    #[test]
    fn position_arithmetic_preserves_the_cube_sum() {
        let position = CubePosition::new(1, -2, 1);
        let moved = position + DIRECTIONS[0];
        assert_eq!(moved.x + moved.y + moved.z, 0);
        assert_eq!(moved - position, DIRECTIONS[0]);
        assert_eq!(moved - DIRECTIONS[0], position);
    }

    #[test]
    fn ring_sizes_grow_by_six_per_distance() {
        let offsets = PathingOffsets::new(4);
        assert_eq!(offsets.max_distance(), 4);
        assert_eq!(offsets.ring(0).len(), 1);
        for distance in 1..=4 {
            assert_eq!(offsets.ring(distance).len(), 6 * distance as usize);
        }
    }

    #[test]
    fn every_offset_steps_back_into_the_previous_ring() {
        let offsets = PathingOffsets::new(3);
        for distance in 1..=3 {
            for (offset, sources) in offsets.ring(distance) {
                assert_eq!(offset.norm(), distance);
                assert!(!sources.is_empty());
                for source in sources {
                    assert!(offsets.ring(distance - 1).contains_key(source));
                    assert_eq!((*offset + -*source).norm(), 1);
                }
            }
        }
    }
}
