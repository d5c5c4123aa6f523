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

//! Shooting: target enumeration under the neutrality rule, shot
//! application, and the catapult range-bonus ledger

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::event::{Event, EventBus};
use crate::hex::{CubeOffset, CubePosition, DIRECTIONS, PathingOffsets};
use crate::map::{GameMap, HexKind};
use crate::tank::{Shooting, Tank, TankRegistry};
use crate::world::WorldError;
use crate::{PlayerId, TankId};

/// Lifetime activation cap for a single catapult hex
const CATAPULT_MAX_USES: u32 = 3;

/// A target hex together with every tank a shot at it hits
///
/// Curved fire carries exactly one target; a direct (piercing) shot may
/// carry several.
pub type ShootingOption = (CubePosition, Vec<TankId>);

/// Owns the attack matrix and the catapult usage table; mirrors occupancy
/// through movement events
pub struct ShootingSystem {
    occupied: HashMap<CubePosition, TankId>,
    attack_matrix: BTreeMap<PlayerId, Vec<PlayerId>>,
    catapult_usage: HashMap<CubePosition, u32>,
}

impl ShootingSystem {
    pub fn new(
        attack_matrix: &BTreeMap<PlayerId, Vec<PlayerId>>,
        catapult_usage: &[CubePosition],
    ) -> Self {
        let mut system = Self {
            occupied: HashMap::new(),
            attack_matrix: BTreeMap::new(),
            catapult_usage: HashMap::new(),
        };
        system.seed(attack_matrix, catapult_usage);
        system
    }

    fn seed(
        &mut self,
        attack_matrix: &BTreeMap<PlayerId, Vec<PlayerId>>,
        catapult_usage: &[CubePosition],
    ) {
        self.attack_matrix = attack_matrix.clone();
        self.catapult_usage.clear();
        for &hex in catapult_usage {
            *self.catapult_usage.entry(hex).or_insert(0) += 1;
        }
    }

    pub fn handle(
        &mut self,
        event: &Event,
        tanks: &mut TankRegistry,
        map: &GameMap,
        _bus: &mut EventBus,
    ) {
        match *event {
            Event::TankAdded(id) => {
                if let Some(tank) = tanks.get(id) {
                    self.occupied.insert(tank.position.current, id);
                    self.attack_matrix.entry(tank.owner).or_default();
                }
            }
            Event::TankMoved { id, to } => {
                self.occupied.retain(|_, occupant| *occupant != id);
                self.occupied.insert(to, id);
            }
            Event::TankRangeBonus(id) => self.on_range_bonus(id, tanks, map),
            _ => {}
        }
    }

    /// Grants the +1 range bonus if the tank stands on a catapult with
    /// charges left and does not already hold one
    fn on_range_bonus(&mut self, id: TankId, tanks: &mut TankRegistry, map: &GameMap) {
        let Some(tank) = tanks.get_mut(id) else {
            return;
        };
        if tank.shooting.bonus_active() {
            return;
        }
        let position = tank.position.current;
        if map.kind_at(position) != HexKind::Catapult {
            return;
        }
        let uses = self.catapult_usage.entry(position).or_insert(0);
        if *uses >= CATAPULT_MAX_USES {
            return;
        }
        *uses += 1;
        debug!(tank = %id, ?position, total_uses = *uses, "catapult used");
        tank.shooting.activate_bonus();
    }

    /// Start-of-turn tick: the acting player's attack row resets
    pub fn turn(&mut self, player: PlayerId) {
        self.attack_matrix.entry(player).or_default().clear();
    }

    /// The neutrality rule
    ///
    /// A shot at `target` is allowed when retaliating (the target attacked
    /// us last round) or when no third player has already attacked the
    /// target.
    fn can_attack(&self, shooter_owner: PlayerId, target: &Tank) -> bool {
        if target.owner == shooter_owner || !target.alive {
            return false;
        }
        if self
            .attack_matrix
            .get(&target.owner)
            .is_some_and(|attacked| attacked.contains(&shooter_owner))
        {
            return true;
        }
        !self.attack_matrix.iter().any(|(&other, attacked)| {
            other != shooter_owner && other != target.owner && attacked.contains(&target.owner)
        })
    }

    /// Every legal shot for the tank, in the shape `apply_shoot` expects
    pub fn shooting_options(
        &self,
        id: TankId,
        tanks: &TankRegistry,
        map: &GameMap,
    ) -> Result<Vec<ShootingOption>, WorldError> {
        let shooter = tanks.get(id).ok_or(WorldError::UnknownTank(id))?;
        match shooter.shooting {
            Shooting::Curved {
                min_range,
                max_range,
                ..
            } => Ok(self.curved_options(id, shooter, min_range, max_range, tanks)),
            Shooting::Direct { max_distance, .. } => {
                Ok(self.direct_options(id, shooter, max_distance, tanks, map))
            }
        }
    }

    fn curved_options(
        &self,
        id: TankId,
        shooter: &Tank,
        min_range: u32,
        max_range: u32,
        tanks: &TankRegistry,
    ) -> Vec<ShootingOption> {
        let mut options = Vec::new();
        for (target_id, target) in tanks.iter() {
            if target_id == id || !self.can_attack(shooter.owner, target) {
                continue;
            }
            let distance = shooter.position.current.distance_to(target.position.current);
            if (min_range..=max_range).contains(&distance) {
                options.push((target.position.current, vec![target_id]));
            }
        }
        options
    }

    fn direct_options(
        &self,
        id: TankId,
        shooter: &Tank,
        max_distance: u32,
        tanks: &TankRegistry,
        map: &GameMap,
    ) -> Vec<ShootingOption> {
        let mut options = Vec::new();
        for direction in DIRECTIONS {
            let targets = self.direct_targets(
                id,
                shooter.owner,
                shooter.position.current,
                direction,
                max_distance,
                tanks,
                map,
            );
            if !targets.is_empty() {
                options.push((shooter.position.current + direction, targets));
            }
        }
        options
    }

    /// Walks one axial ray, collecting every attackable tank until an
    /// obstacle stops the shell
    fn direct_targets(
        &self,
        shooter_id: TankId,
        shooter_owner: PlayerId,
        start: CubePosition,
        direction: CubeOffset,
        max_distance: u32,
        tanks: &TankRegistry,
        map: &GameMap,
    ) -> Vec<TankId> {
        let mut targets = Vec::new();
        for step in 1..=max_distance {
            let position = start + direction * step as i32;
            if !map.kind_at(position).is_shoot_through() {
                break;
            }
            let Some(&target_id) = self.occupied.get(&position) else {
                continue;
            };
            if target_id == shooter_id {
                continue;
            }
            if let Some(target) = tanks.get(target_id) {
                if self.can_attack(shooter_owner, target) {
                    targets.push(target_id);
                }
            }
        }
        targets
    }

    /// Applies a shot the caller obtained from `shooting_options` (or the
    /// server reported)
    ///
    /// Resolves the targets for the option shape, emits `TankShot` per
    /// target, records the attack in the matrix, and consumes an active
    /// range bonus. A shot that resolves to nothing (target already gone)
    /// is silently dropped.
    pub fn shoot(
        &mut self,
        id: TankId,
        target_position: CubePosition,
        tanks: &mut TankRegistry,
        map: &GameMap,
        bus: &mut EventBus,
    ) -> Result<(), WorldError> {
        let shooter = tanks.get(id).ok_or(WorldError::UnknownTank(id))?;
        let shooter_owner = shooter.owner;
        let damage = shooter.shooting.damage();

        let targets: Vec<TankId> = match shooter.shooting {
            Shooting::Curved { .. } => match self.occupied.get(&target_position) {
                Some(&target_id) => match tanks.get(target_id) {
                    Some(target) if target.owner != shooter_owner => vec![target_id],
                    _ => Vec::new(),
                },
                None => Vec::new(),
            },
            Shooting::Direct { max_distance, .. } => {
                let direction = target_position - shooter.position.current;
                if DIRECTIONS.contains(&direction) {
                    self.direct_targets(
                        id,
                        shooter_owner,
                        shooter.position.current,
                        direction,
                        max_distance,
                        tanks,
                        map,
                    )
                } else {
                    Vec::new()
                }
            }
        };

        for &target_id in &targets {
            let Some(target) = tanks.get(target_id) else {
                continue;
            };
            let row = self.attack_matrix.entry(shooter_owner).or_default();
            if !row.contains(&target.owner) {
                row.push(target.owner);
            }
            bus.emit(Event::TankShot {
                id: target_id,
                damage,
            });
        }

        if let Some(shooter) = tanks.get_mut(id) {
            shooter.shooting.consume_bonus();
        }
        Ok(())
    }

    /// Every hex the tank could target from where it stands; feeds the
    /// planner's threat map
    pub fn shootable_positions(
        &self,
        id: TankId,
        tanks: &TankRegistry,
        map: &GameMap,
        offsets: &PathingOffsets,
    ) -> Result<HashSet<CubePosition>, WorldError> {
        let shooter = tanks.get(id).ok_or(WorldError::UnknownTank(id))?;
        let start = shooter.position.current;
        let mut positions = HashSet::new();
        match shooter.shooting {
            Shooting::Curved {
                min_range,
                max_range,
                ..
            } => {
                for distance in min_range..=max_range.min(offsets.max_distance()) {
                    for &offset in offsets.ring(distance).keys() {
                        positions.insert(start + offset);
                    }
                }
            }
            Shooting::Direct { max_distance, .. } => {
                for direction in DIRECTIONS {
                    for step in 1..=max_distance {
                        let position = start + direction * step as i32;
                        if !map.kind_at(position).is_shoot_through() {
                            break;
                        }
                        positions.insert(position);
                    }
                }
            }
        }
        Ok(positions)
    }

    /// Players this player has attacked in the current round
    pub fn attack_row(&self, player: PlayerId) -> &[PlayerId] {
        match self.attack_matrix.get(&player) {
            Some(row) => row,
            None => &[],
        }
    }

    /// Lifetime activations of the catapult at `position`
    pub fn catapult_uses(&self, position: CubePosition) -> u32 {
        self.catapult_usage.get(&position).copied().unwrap_or(0)
    }

    pub fn reset(
        &mut self,
        attack_matrix: &BTreeMap<PlayerId, Vec<PlayerId>>,
        catapult_usage: &[CubePosition],
    ) {
        self.occupied.clear();
        self.seed(attack_matrix, catapult_usage);
    }
}
