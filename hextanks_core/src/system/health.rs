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

//! Health: damage application, destruction at zero, heals on repair and
//! respawn

use tracing::debug;

use crate::event::{Event, EventBus};
use crate::tank::TankRegistry;

/// Applies every health change; the only emitter of `TankDestroyed`
#[derive(Default)]
pub struct HealthSystem;

impl HealthSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&mut self, event: &Event, tanks: &mut TankRegistry, bus: &mut EventBus) {
        match *event {
            Event::TankShot { id, damage } => {
                let Some(tank) = tanks.get_mut(id) else {
                    debug!(tank = %id, "shot reported for a tank the mirror does not know");
                    return;
                };
                // a destroyed tank awaiting respawn is not damageable
                if !tank.alive || tank.health.current <= 0 {
                    return;
                }
                tank.health.current = (tank.health.current - damage).max(0);
                if tank.health.current == 0 {
                    tank.alive = false;
                    bus.emit(Event::TankDestroyed(id));
                }
            }
            Event::TankRespawned(id) => {
                if let Some(tank) = tanks.get_mut(id) {
                    tank.alive = true;
                    tank.health.current = tank.health.max;
                }
            }
            Event::TankRepaired(id) => {
                if let Some(tank) = tanks.get_mut(id) {
                    debug!(tank = %id, "repair used");
                    tank.health.current = tank.health.max;
                }
            }
            _ => {}
        }
    }
}
