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

//! Respawn: destroyed tanks queue up and return at the next turn tick
//!
//! A tank destroyed mid-turn stays off the board for the rest of the
//! turn-cycle and reappears at its spawn with full health when `turn()`
//! replays the queue.

use crate::TankId;
use crate::event::{Event, EventBus};

#[derive(Default)]
pub struct RespawnSystem {
    destroyed: Vec<TankId>,
}

impl RespawnSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &Event) {
        if let Event::TankDestroyed(id) = *event {
            self.destroyed.push(id);
        }
    }

    /// Emits a respawn for every queued destruction and clears the queue
    pub fn turn(&mut self, bus: &mut EventBus) {
        for id in self.destroyed.drain(..) {
            bus.emit(Event::TankRespawned(id));
        }
    }

    pub fn reset(&mut self) {
        self.destroyed.clear();
    }
}
