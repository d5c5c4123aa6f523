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

//! Tank movement: legal-destination enumeration, moves, respawn placement

use std::collections::{BTreeSet, HashMap};

use crate::TankId;
use crate::event::{Event, EventBus};
use crate::hex::{CubeOffset, CubePosition, PathingOffsets};
use crate::map::GameMap;
use crate::tank::TankRegistry;
use crate::world::WorldError;

/// Owns the occupancy and spawn-hex mirrors and applies every position
/// change
#[derive(Default)]
pub struct MovementSystem {
    occupied: HashMap<CubePosition, TankId>,
    spawns: HashMap<CubePosition, TankId>,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &Event, tanks: &mut TankRegistry, bus: &mut EventBus) {
        match *event {
            Event::TankAdded(id) => {
                if let Some(tank) = tanks.get(id) {
                    self.occupied.insert(tank.position.current, id);
                    self.spawns.insert(tank.position.spawn, id);
                }
            }
            Event::TankRespawned(id) => {
                let Some(spawn) = tanks.get(id).map(|tank| tank.position.spawn) else {
                    return;
                };
                let _ = self.move_tank(id, spawn, tanks, bus);
            }
            _ => {}
        }
    }

    /// Every hex the tank can legally end its move on
    ///
    /// Breadth-first search up to the tank's speed over the precomputed
    /// offset table. Obstacles block traversal; occupied hexes and foreign
    /// spawn hexes are passable but rejected as destinations.
    pub fn movement_options(
        &self,
        id: TankId,
        tanks: &TankRegistry,
        map: &GameMap,
        offsets: &PathingOffsets,
    ) -> Result<Vec<CubePosition>, WorldError> {
        let tank = tanks.get(id).ok_or(WorldError::UnknownTank(id))?;
        let start = tank.position.current;
        let speed = tank.position.speed.min(offsets.max_distance());

        let mut visited = BTreeSet::new();
        visited.insert(CubeOffset::new(0, 0, 0));
        let mut options = Vec::new();

        for distance in 1..=speed {
            for (&offset, sources) in offsets.ring(distance) {
                if !sources.iter().any(|source| visited.contains(source)) {
                    continue;
                }
                let position = start + offset;
                if !position.in_bounds(map.size()) {
                    continue;
                }
                if !map.kind_at(position).is_traversable() {
                    continue;
                }
                visited.insert(offset);
                if self.occupied.contains_key(&position) {
                    continue;
                }
                if self.spawns.get(&position).is_some_and(|&owner| owner != id) {
                    continue;
                }
                options.push(position);
            }
        }

        Ok(options)
    }

    /// Moves the tank, updating the occupancy mirror before the event goes
    /// out
    ///
    /// The caller is responsible for having obtained the destination from
    /// [`Self::movement_options`] or an equivalent server-reported move.
    pub fn move_tank(
        &mut self,
        id: TankId,
        to: CubePosition,
        tanks: &mut TankRegistry,
        bus: &mut EventBus,
    ) -> Result<(), WorldError> {
        let tank = tanks.get_mut(id).ok_or(WorldError::UnknownTank(id))?;
        let from = tank.position.current;
        tank.position.current = to;
        self.occupied.remove(&from);
        self.occupied.insert(to, id);
        bus.emit(Event::TankMoved { id, to });
        Ok(())
    }

    pub fn reset(&mut self) {
        self.occupied.clear();
        self.spawns.clear();
    }
}
