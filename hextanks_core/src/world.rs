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

//! The world facade: owns the map, the registries, the event bus, and
//! every simulator system
//!
//! A turn is an atomic unit of work. The session layer applies
//! server-reported or locally-decided actions through `apply_move` /
//! `apply_shoot`, sequences the `turn()` / `round()` ticks, and rebuilds
//! from a fresh snapshot on a desync. Events fire synchronously within a
//! call; no external observer ever sees intermediate state.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::event::{Event, EventBus, EventKind, SystemId};
use crate::hex::{CubePosition, PathingOffsets};
use crate::map::GameMap;
use crate::player::PlayerRegistry;
use crate::protocol::{GameStatePayload, MapPayload};
use crate::system::bonus::PositionBonusSystem;
use crate::system::capture::BaseCaptureSystem;
use crate::system::health::HealthSystem;
use crate::system::movement::MovementSystem;
use crate::system::respawn::RespawnSystem;
use crate::system::shooting::{ShootingOption, ShootingSystem};
use crate::tank::{Tank, TankRegistry};
use crate::{PlayerId, TankId};

/// A rule violation: the caller acted on a tank the world does not know
///
/// Reported, never retried; legal actions come out of the corresponding
/// options query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("unknown tank id {0}")]
    UnknownTank(TankId),
}

pub struct World {
    map: GameMap,
    offsets: PathingOffsets,
    tanks: TankRegistry,
    players: PlayerRegistry,
    bus: EventBus,
    movement: MovementSystem,
    shooting: ShootingSystem,
    health: HealthSystem,
    respawn: RespawnSystem,
    bonus: PositionBonusSystem,
    capture: BaseCaptureSystem,
}

impl World {
    /// Builds the local mirror from the initial map and game-state
    /// payloads
    pub fn new(map_payload: &MapPayload, state: &GameStatePayload) -> Self {
        let map = GameMap::from_payload(map_payload);
        // deep enough for the planner's whole-board base sweeps, not just
        // tank speeds
        let offsets = PathingOffsets::new(map.size().unsigned_abs() * 2);
        let mut bus = EventBus::new();
        Self::register_handlers(&mut bus);

        let mut world = Self {
            map,
            offsets,
            tanks: TankRegistry::new(),
            players: PlayerRegistry::new(),
            bus,
            movement: MovementSystem::new(),
            shooting: ShootingSystem::new(&state.attack_matrix, &state.catapult_usage),
            health: HealthSystem::new(),
            respawn: RespawnSystem::new(),
            bonus: PositionBonusSystem::new(),
            capture: BaseCaptureSystem::new(),
        };
        world.adopt(state);
        world
    }

    fn register_handlers(bus: &mut EventBus) {
        bus.subscribe(EventKind::TankAdded, SystemId::Movement);
        bus.subscribe(EventKind::TankAdded, SystemId::Shooting);
        bus.subscribe(EventKind::TankMoved, SystemId::Shooting);
        bus.subscribe(EventKind::TankShot, SystemId::Health);
        bus.subscribe(EventKind::TankDestroyed, SystemId::Respawn);
        bus.subscribe(EventKind::TankRespawned, SystemId::Movement);
        bus.subscribe(EventKind::TankRespawned, SystemId::Health);
        bus.subscribe(EventKind::TankRepaired, SystemId::Health);
        bus.subscribe(EventKind::TankRangeBonus, SystemId::Shooting);
    }

    /// Creates entities for vehicles first seen in this snapshot and
    /// adopts new players
    fn adopt(&mut self, state: &GameStatePayload) {
        for (&id, vehicle) in &state.vehicles {
            if !self.tanks.contains(id) {
                self.tanks.insert(id, Tank::from_payload(vehicle));
                self.bus.emit(Event::TankAdded(id));
            }
        }
        self.players.sync(state);
        self.dispatch();
    }

    /// Drains the event queue, invoking each kind's handler list in
    /// registration order
    fn dispatch(&mut self) {
        while let Some(event) = self.bus.pop() {
            let handlers = self.bus.handlers_for(event.kind()).to_vec();
            for system in handlers {
                match system {
                    SystemId::Movement => {
                        self.movement.handle(&event, &mut self.tanks, &mut self.bus);
                    }
                    SystemId::Shooting => {
                        self.shooting
                            .handle(&event, &mut self.tanks, &self.map, &mut self.bus);
                    }
                    SystemId::Health => {
                        self.health.handle(&event, &mut self.tanks, &mut self.bus);
                    }
                    SystemId::Respawn => self.respawn.handle(&event),
                }
            }
        }
    }

    /// Start-of-turn tick
    ///
    /// Adopts new tanks and players, mirrors the acting player's score,
    /// replays queued respawns, hands out position bonuses, resets capture
    /// for tanks off base, and clears the acting player's attack row.
    pub fn turn(&mut self, state: &GameStatePayload) {
        self.adopt(state);
        self.players.update_scores(state);
        self.respawn.turn(&mut self.bus);
        self.dispatch();
        self.bonus.turn(&self.tanks, &self.map, &mut self.bus);
        self.dispatch();
        self.capture.turn(&mut self.tanks, &self.map);
        if let Some(current) = state.current_player_idx {
            self.shooting.turn(current);
        }
    }

    /// End-of-round tick: capture points accrue on uncontested bases
    pub fn round(&mut self) {
        self.capture.round(&mut self.tanks, &self.map);
    }

    /// Applies a locally-decided or server-reported move to the mirror
    pub fn apply_move(&mut self, id: TankId, to: CubePosition) -> Result<(), WorldError> {
        self.movement
            .move_tank(id, to, &mut self.tanks, &mut self.bus)?;
        self.dispatch();
        Ok(())
    }

    /// Applies a locally-decided or server-reported shot to the mirror
    pub fn apply_shoot(&mut self, id: TankId, target: CubePosition) -> Result<(), WorldError> {
        self.shooting
            .shoot(id, target, &mut self.tanks, &self.map, &mut self.bus)?;
        self.dispatch();
        Ok(())
    }

    /// Rebuilds every system from a fresh snapshot after a desync
    pub fn reset(&mut self, state: &GameStatePayload) {
        debug!("rebuilding the local mirror from a fresh snapshot");
        self.tanks.clear();
        self.players.clear();
        self.bus.clear_queue();
        self.movement.reset();
        self.shooting.reset(&state.attack_matrix, &state.catapult_usage);
        self.respawn.reset();
        self.adopt(state);
    }

    /// Every hex the tank can legally end its move on
    pub fn movement_options(&self, id: TankId) -> Result<Vec<CubePosition>, WorldError> {
        self.movement
            .movement_options(id, &self.tanks, &self.map, &self.offsets)
    }

    /// Every legal shot for the tank under the neutrality rule
    pub fn shooting_options(&self, id: TankId) -> Result<Vec<ShootingOption>, WorldError> {
        self.shooting.shooting_options(id, &self.tanks, &self.map)
    }

    /// Every hex the tank could target from where it stands
    pub fn shootable_positions(&self, id: TankId) -> Result<HashSet<CubePosition>, WorldError> {
        self.shooting
            .shootable_positions(id, &self.tanks, &self.map, &self.offsets)
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn pathing(&self) -> &PathingOffsets {
        &self.offsets
    }

    pub fn tanks(&self) -> &TankRegistry {
        &self.tanks
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    /// Players this player has attacked in the current round
    pub fn attack_row(&self, player: PlayerId) -> &[PlayerId] {
        self.shooting.attack_row(player)
    }

    /// Lifetime activations of the catapult at `position`
    pub fn catapult_uses(&self, position: CubePosition) -> u32 {
        self.shooting.catapult_uses(position)
    }

    #[cfg(test)]
    pub(crate) fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_payload() -> MapPayload {
        serde_json::from_value(serde_json::json!({
            "size": 11,
            "name": "test",
            "spawn_points": [],
            "content": {},
        }))
        .unwrap()
    }

    fn state_payload(vehicles: serde_json::Value) -> GameStatePayload {
        serde_json::from_value(serde_json::json!({
            "num_players": 2,
            "num_turns": 45,
            "current_turn": 0,
            "current_player_idx": 1,
            "finished": false,
            "players": [
                {"idx": 1, "name": "alpha", "is_observer": false},
                {"idx": 2, "name": "beta", "is_observer": false},
            ],
            "observers": [],
            "vehicles": vehicles,
            "attack_matrix": {"1": [], "2": []},
            "win_points": {},
        }))
        .unwrap()
    }

    fn two_mediums() -> serde_json::Value {
        serde_json::json!({
            "1": {"player_id": 1, "vehicle_type": "medium_tank", "health": 2,
                  "spawn_position": {"x": -7, "y": 7, "z": 0}, "position": {"x": 0, "y": 0, "z": 0}},
            "6": {"player_id": 2, "vehicle_type": "medium_tank", "health": 2,
                  "spawn_position": {"x": 7, "y": -7, "z": 0}, "position": {"x": 2, "y": -1, "z": -1}},
        })
    }

    #[test]
    fn construction_adopts_every_vehicle() {
        let world = World::new(&map_payload(), &state_payload(two_mediums()));
        assert_eq!(world.tanks().len(), 2);
        assert!(world.players().get(PlayerId::from(1)).is_some());
    }

    #[test]
    fn vehicles_are_adopted_lazily_on_later_snapshots() {
        let mut world = World::new(&map_payload(), &state_payload(serde_json::json!({})));
        assert!(world.tanks().is_empty());
        world.turn(&state_payload(two_mediums()));
        assert_eq!(world.tanks().len(), 2);
    }

    #[test]
    fn a_move_flows_through_to_every_mirror() {
        let mut world = World::new(&map_payload(), &state_payload(two_mediums()));
        let id = TankId::from(1);
        // still at curved range 2 from the enemy, but on a different hex
        let to = CubePosition::new(0, 1, -1);
        world.apply_move(id, to).unwrap();
        assert_eq!(world.tanks().get(id).unwrap().position.current, to);
        // shooting occupancy followed the move: the enemy's only option
        // points at the new hex
        let enemy_options = world.shooting_options(TankId::from(6)).unwrap();
        assert_eq!(enemy_options, vec![(to, vec![id])]);
    }

    #[test]
    fn acting_on_an_unknown_tank_is_reported() {
        let mut world = World::new(&map_payload(), &state_payload(serde_json::json!({})));
        let missing = TankId::from(42);
        assert_eq!(
            world.apply_move(missing, CubePosition::new(0, 0, 0)),
            Err(WorldError::UnknownTank(missing))
        );
        assert_eq!(
            world.apply_shoot(missing, CubePosition::new(0, 0, 0)),
            Err(WorldError::UnknownTank(missing))
        );
        assert!(world.movement_options(missing).is_err());
        assert!(world.shooting_options(missing).is_err());
        assert!(world.shootable_positions(missing).is_err());
    }

    #[test]
    fn reset_rebuilds_from_the_snapshot() {
        let mut world = World::new(&map_payload(), &state_payload(two_mediums()));
        world
            .apply_move(TankId::from(1), CubePosition::new(1, 0, -1))
            .unwrap();

        // the fresh snapshot has the tank back at the origin
        world.reset(&state_payload(two_mediums()));
        assert_eq!(
            world.tanks().get(TankId::from(1)).unwrap().position.current,
            CubePosition::new(0, 0, 0)
        );
        assert_eq!(world.tanks().len(), 2);
    }

    #[test]
    fn turn_clears_the_acting_players_attack_row() {
        let mut world = World::new(&map_payload(), &state_payload(two_mediums()));
        world
            .apply_shoot(TankId::from(1), CubePosition::new(2, -1, -1))
            .unwrap();
        assert_eq!(world.attack_row(PlayerId::from(1)), &[PlayerId::from(2)]);

        world.turn(&state_payload(two_mediums()));
        assert!(world.attack_row(PlayerId::from(1)).is_empty());
    }
}
