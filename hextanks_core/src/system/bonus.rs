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

//! Position bonuses: repairs and catapult range boosts for tanks standing
//! on the matching special hexes

use crate::event::{Event, EventBus};
use crate::map::{GameMap, HexKind};
use crate::tank::TankRegistry;

#[derive(Default)]
pub struct PositionBonusSystem;

impl PositionBonusSystem {
    pub fn new() -> Self {
        Self
    }

    /// Per-turn sweep: repair events for class-matching repair hexes, range
    /// bonus events for catapults
    pub fn turn(&self, tanks: &TankRegistry, map: &GameMap, bus: &mut EventBus) {
        for (id, tank) in tanks.iter() {
            match map.kind_at(tank.position.current) {
                kind @ (HexKind::LightRepair | HexKind::HardRepair) => {
                    if tank.archetype.repair_kind() == Some(kind) {
                        bus.emit(Event::TankRepaired(id));
                    }
                }
                HexKind::Catapult => bus.emit(Event::TankRangeBonus(id)),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TankId;
    use crate::protocol::{MapPayload, VehiclePayload};
    use crate::tank::Tank;

    fn fixture() -> (GameMap, TankRegistry, EventBus) {
        let payload: MapPayload = serde_json::from_value(serde_json::json!({
            "size": 11,
            "name": "test",
            "spawn_points": [],
            "content": {
                "light_repair": [{"x": 0, "y": 0, "z": 0}],
                "hard_repair": [{"x": 1, "y": 0, "z": -1}],
                "catapult": [{"x": 2, "y": 0, "z": -2}],
            },
        }))
        .unwrap();
        (GameMap::from_payload(&payload), TankRegistry::new(), EventBus::new())
    }

    fn tank(player: u32, vehicle_type: &str, position: (i32, i32, i32)) -> Tank {
        let payload: VehiclePayload = serde_json::from_value(serde_json::json!({
            "player_id": player,
            "vehicle_type": vehicle_type,
            "health": 1,
            "spawn_position": {"x": -5, "y": 5, "z": 0},
            "position": {"x": position.0, "y": position.1, "z": position.2},
        }))
        .unwrap();
        Tank::from_payload(&payload)
    }

    #[test]
    fn repairs_fire_only_for_the_matching_class() {
        let (map, mut tanks, mut bus) = fixture();
        tanks.insert(TankId::from(1), tank(1, "medium_tank", (0, 0, 0)));
        tanks.insert(TankId::from(2), tank(1, "heavy_tank", (0, 0, 0)));
        tanks.insert(TankId::from(3), tank(1, "at_spg", (1, 0, -1)));
        tanks.insert(TankId::from(4), tank(1, "spg", (1, 0, -1)));

        PositionBonusSystem::new().turn(&tanks, &map, &mut bus);
        let mut events = Vec::new();
        while let Some(event) = bus.pop() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                Event::TankRepaired(TankId::from(1)),
                Event::TankRepaired(TankId::from(3)),
            ]
        );
    }

    #[test]
    fn catapults_emit_range_bonuses_for_everyone() {
        let (map, mut tanks, mut bus) = fixture();
        tanks.insert(TankId::from(1), tank(1, "spg", (2, 0, -2)));
        PositionBonusSystem::new().turn(&tanks, &map, &mut bus);
        assert_eq!(bus.pop(), Some(Event::TankRangeBonus(TankId::from(1))));
    }

    #[test]
    fn plain_ground_grants_nothing() {
        let (map, mut tanks, mut bus) = fixture();
        tanks.insert(TankId::from(1), tank(1, "medium_tank", (5, -5, 0)));
        PositionBonusSystem::new().turn(&tanks, &map, &mut bus);
        assert_eq!(bus.pop(), None);
    }
}
