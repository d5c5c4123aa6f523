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

//! Static terrain lookup, built once from the server's map description

use std::collections::BTreeMap;

use crate::hex::CubePosition;
use crate::protocol::MapPayload;

/// What occupies a hex of the static map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexKind {
    Empty,
    Base,
    Obstacle,
    Catapult,
    LightRepair,
    HardRepair,
}

impl HexKind {
    /// Tanks stand on and pass through anything but obstacles
    pub fn is_traversable(self) -> bool {
        self != Self::Obstacle
    }

    /// Direct fire passes over anything but obstacles
    pub fn is_shoot_through(self) -> bool {
        self != Self::Obstacle
    }
}

/// The game board: bounded hex grid with special hexes, immutable after
/// construction
pub struct GameMap {
    size: i32,
    name: String,
    cells: BTreeMap<CubePosition, HexKind>,
}

impl GameMap {
    pub fn from_payload(payload: &MapPayload) -> Self {
        let mut cells = BTreeMap::new();
        for &hex in &payload.content.base {
            cells.insert(hex, HexKind::Base);
        }
        for &hex in &payload.content.obstacle {
            cells.insert(hex, HexKind::Obstacle);
        }
        for &hex in &payload.content.catapult {
            cells.insert(hex, HexKind::Catapult);
        }
        for &hex in &payload.content.light_repair {
            cells.insert(hex, HexKind::LightRepair);
        }
        for &hex in &payload.content.hard_repair {
            cells.insert(hex, HexKind::HardRepair);
        }
        Self {
            size: payload.size,
            name: payload.name.clone(),
            cells,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Terrain at a position; anything the server did not list is empty
    /// ground
    pub fn kind_at(&self, position: CubePosition) -> HexKind {
        self.cells.get(&position).copied().unwrap_or(HexKind::Empty)
    }

    /// Every hex that carries something other than empty ground
    pub fn special_hexes(&self) -> impl Iterator<Item = (CubePosition, HexKind)> + '_ {
        self.cells.iter().map(|(&position, &kind)| (position, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> MapPayload {
        serde_json::from_value(serde_json::json!({
            "size": 11,
            "name": "proving_ground",
            "spawn_points": [],
            "content": {
                "base": [{"x": 0, "y": 0, "z": 0}],
                "obstacle": [{"x": 1, "y": 0, "z": -1}],
                "catapult": [{"x": 2, "y": 0, "z": -2}],
                "light_repair": [{"x": 3, "y": 0, "z": -3}],
                "hard_repair": [{"x": 4, "y": 0, "z": -4}]
            }
        }))
        .unwrap()
    }

    #[test]
    fn kinds_come_from_the_payload_and_default_to_empty() {
        let map = GameMap::from_payload(&payload());
        assert_eq!(map.size(), 11);
        assert_eq!(map.name(), "proving_ground");
        assert_eq!(map.kind_at(CubePosition::new(0, 0, 0)), HexKind::Base);
        assert_eq!(map.kind_at(CubePosition::new(1, 0, -1)), HexKind::Obstacle);
        assert_eq!(map.kind_at(CubePosition::new(2, 0, -2)), HexKind::Catapult);
        assert_eq!(map.kind_at(CubePosition::new(3, 0, -3)), HexKind::LightRepair);
        assert_eq!(map.kind_at(CubePosition::new(4, 0, -4)), HexKind::HardRepair);
        assert_eq!(map.kind_at(CubePosition::new(-5, 5, 0)), HexKind::Empty);
    }

    #[test]
    fn only_obstacles_block_movement_and_fire() {
        for kind in [
            HexKind::Empty,
            HexKind::Base,
            HexKind::Catapult,
            HexKind::LightRepair,
            HexKind::HardRepair,
        ] {
            assert!(kind.is_traversable());
            assert!(kind.is_shoot_through());
        }
        assert!(!HexKind::Obstacle.is_traversable());
        assert!(!HexKind::Obstacle.is_shoot_through());
    }

    #[test]
    fn special_hexes_lists_everything_once() {
        let map = GameMap::from_payload(&payload());
        assert_eq!(map.special_hexes().count(), 5);
    }
}
