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

//! Players and observers, with each player's tanks held in the fixed
//! archetype turn order

use std::collections::BTreeMap;

use crate::protocol::GameStatePayload;
use crate::tank::TURN_ORDER;
use crate::{PlayerId, TankId};

/// One participant who commands tanks
pub struct Player {
    id: PlayerId,
    name: String,
    /// Owned tank ids indexed by [`TURN_ORDER`] slot
    tanks: [Option<TankId>; TURN_ORDER.len()],
    capture_points: i32,
    destruction_points: i32,
}

impl Player {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owned tank ids in acting order
    pub fn tank_ids(&self) -> impl Iterator<Item = TankId> + '_ {
        self.tanks.iter().flatten().copied()
    }

    pub fn capture_points(&self) -> i32 {
        self.capture_points
    }

    pub fn destruction_points(&self) -> i32 {
        self.destruction_points
    }
}

/// Every participant seen this game, partitioned into players and
/// observers
#[derive(Default)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, Player>,
    observers: BTreeMap<PlayerId, String>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts participants first seen in a snapshot; a new player's tank
    /// ids are resolved from the vehicles dictionary into turn-order slots
    pub fn sync(&mut self, state: &GameStatePayload) {
        for payload in state.players.iter().chain(&state.observers) {
            if payload.is_observer {
                self.observers
                    .entry(payload.idx)
                    .or_insert_with(|| payload.name.clone());
                continue;
            }
            if self.players.contains_key(&payload.idx) {
                continue;
            }
            let mut tanks = [None; TURN_ORDER.len()];
            for (&id, vehicle) in &state.vehicles {
                if vehicle.player_id == payload.idx {
                    tanks[vehicle.vehicle_type.turn_slot()] = Some(id);
                }
            }
            self.players.insert(
                payload.idx,
                Player {
                    id: payload.idx,
                    name: payload.name.clone(),
                    tanks,
                    capture_points: 0,
                    destruction_points: 0,
                },
            );
        }
    }

    /// Mirrors the acting player's scoreboard entry from `win_points`
    pub fn update_scores(&mut self, state: &GameStatePayload) {
        let Some(current) = state.current_player_idx else {
            return;
        };
        if let (Some(player), Some(points)) = (
            self.players.get_mut(&current),
            state.win_points.get(&current),
        ) {
            player.capture_points = points.capture;
            player.destruction_points = points.kill;
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn is_observer(&self, id: PlayerId) -> bool {
        self.observers.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.observers.clear();
    }
}
