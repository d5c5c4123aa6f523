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

//! Tank entities: the archetype attribute table, the fixed component
//! record, and the id-keyed registry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hex::CubePosition;
use crate::map::HexKind;
use crate::protocol::VehiclePayload;
use crate::{PlayerId, TankId};

/// The five vehicle classes, in their wire spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankArchetype {
    Spg,
    LightTank,
    HeavyTank,
    MediumTank,
    AtSpg,
}

/// The order in which a player's tanks act within their turn
pub const TURN_ORDER: [TankArchetype; 5] = [
    TankArchetype::Spg,
    TankArchetype::LightTank,
    TankArchetype::HeavyTank,
    TankArchetype::MediumTank,
    TankArchetype::AtSpg,
];

impl TankArchetype {
    pub fn max_health(self) -> i32 {
        match self {
            Self::Spg | Self::LightTank => 1,
            Self::MediumTank | Self::AtSpg => 2,
            Self::HeavyTank => 3,
        }
    }

    /// Speed points: how many hex-steps per turn
    pub fn speed(self) -> u32 {
        match self {
            Self::Spg | Self::HeavyTank | Self::AtSpg => 1,
            Self::MediumTank => 2,
            Self::LightTank => 3,
        }
    }

    pub fn damage(self) -> i32 {
        1
    }

    /// Points awarded to whoever destroys this class
    pub fn destruction_reward(self) -> i32 {
        match self {
            Self::Spg | Self::LightTank => 1,
            Self::MediumTank | Self::AtSpg => 2,
            Self::HeavyTank => 3,
        }
    }

    /// Base shooting profile, before any catapult bonus
    pub fn shooting(self) -> Shooting {
        match self {
            Self::Spg => Shooting::Curved {
                min_range: 3,
                max_range: 3,
                damage: self.damage(),
                bonus_active: false,
            },
            Self::LightTank | Self::MediumTank => Shooting::Curved {
                min_range: 2,
                max_range: 2,
                damage: self.damage(),
                bonus_active: false,
            },
            Self::HeavyTank => Shooting::Curved {
                min_range: 1,
                max_range: 2,
                damage: self.damage(),
                bonus_active: false,
            },
            Self::AtSpg => Shooting::Direct {
                max_distance: 3,
                damage: self.damage(),
                bonus_active: false,
            },
        }
    }

    /// The repair terrain that heals this class, if any
    pub fn repair_kind(self) -> Option<HexKind> {
        match self {
            Self::MediumTank => Some(HexKind::LightRepair),
            Self::HeavyTank | Self::AtSpg => Some(HexKind::HardRepair),
            Self::Spg | Self::LightTank => None,
        }
    }

    /// Index of this class in [`TURN_ORDER`]
    pub fn turn_slot(self) -> usize {
        match self {
            Self::Spg => 0,
            Self::LightTank => 1,
            Self::HeavyTank => 2,
            Self::MediumTank => 3,
            Self::AtSpg => 4,
        }
    }
}

/// How a tank attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shooting {
    /// Lobbed over terrain at a single target inside a distance band
    Curved {
        min_range: u32,
        max_range: u32,
        damage: i32,
        bonus_active: bool,
    },
    /// Fired along an axial direction, hitting everything until an obstacle
    Direct {
        max_distance: u32,
        damage: i32,
        bonus_active: bool,
    },
}

impl Shooting {
    pub fn damage(&self) -> i32 {
        match *self {
            Self::Curved { damage, .. } | Self::Direct { damage, .. } => damage,
        }
    }

    pub fn bonus_active(&self) -> bool {
        match *self {
            Self::Curved { bonus_active, .. } | Self::Direct { bonus_active, .. } => bonus_active,
        }
    }

    /// Outer reach: `max_range` for curved fire, `max_distance` for direct
    pub fn max_reach(&self) -> u32 {
        match *self {
            Self::Curved { max_range, .. } => max_range,
            Self::Direct { max_distance, .. } => max_distance,
        }
    }

    /// Grants the +1 range catapult bonus; granting twice is a no-op
    pub fn activate_bonus(&mut self) {
        match self {
            Self::Curved {
                max_range,
                bonus_active,
                ..
            } if !*bonus_active => {
                *max_range += 1;
                *bonus_active = true;
            }
            Self::Direct {
                max_distance,
                bonus_active,
                ..
            } if !*bonus_active => {
                *max_distance += 1;
                *bonus_active = true;
            }
            _ => {}
        }
    }

    /// Spends the bonus after a shot; the range reverts by one
    pub fn consume_bonus(&mut self) {
        match self {
            Self::Curved {
                max_range,
                bonus_active,
                ..
            } if *bonus_active => {
                *max_range -= 1;
                *bonus_active = false;
            }
            Self::Direct {
                max_distance,
                bonus_active,
                ..
            } if *bonus_active => {
                *max_distance -= 1;
                *bonus_active = false;
            }
            _ => {}
        }
    }
}

/// Where a tank is, where it respawns, how far it moves
#[derive(Debug, Clone, Copy)]
pub struct PositionComponent {
    pub spawn: CubePosition,
    pub current: CubePosition,
    pub speed: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct HealthComponent {
    pub max: i32,
    pub current: i32,
}

/// Capture points accrued while standing on a base hex
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureComponent {
    pub points: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct DestructionReward {
    pub points: i32,
}

/// A tank entity: the fixed component record every vehicle carries
///
/// Tanks are created lazily when first seen in the server's `vehicles`
/// dictionary and live until game end; destruction only clears the alive
/// flag.
#[derive(Debug, Clone)]
pub struct Tank {
    pub archetype: TankArchetype,
    pub owner: PlayerId,
    pub position: PositionComponent,
    pub health: HealthComponent,
    pub capture: CaptureComponent,
    pub shooting: Shooting,
    pub destruction_reward: DestructionReward,
    pub alive: bool,
}

impl Tank {
    /// Builds the entity from the server's vehicle record
    pub fn from_payload(payload: &VehiclePayload) -> Self {
        let archetype = payload.vehicle_type;
        let mut shooting = archetype.shooting();
        if payload.shoot_range_bonus > 0 {
            shooting.activate_bonus();
        }
        Self {
            archetype,
            owner: payload.player_id,
            position: PositionComponent {
                spawn: payload.spawn_position,
                current: payload.position,
                speed: archetype.speed(),
            },
            health: HealthComponent {
                max: archetype.max_health(),
                current: payload.health,
            },
            capture: CaptureComponent {
                points: payload.capture_points,
            },
            shooting,
            destruction_reward: DestructionReward {
                points: archetype.destruction_reward(),
            },
            alive: payload.health > 0,
        }
    }
}

/// Every tank entity seen this game, keyed by server id
#[derive(Default)]
pub struct TankRegistry {
    tanks: BTreeMap<TankId, Tank>,
}

impl TankRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TankId, tank: Tank) {
        self.tanks.insert(id, tank);
    }

    pub fn contains(&self, id: TankId) -> bool {
        self.tanks.contains_key(&id)
    }

    pub fn get(&self, id: TankId) -> Option<&Tank> {
        self.tanks.get(&id)
    }

    pub fn get_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.get_mut(&id)
    }

    /// Entities in id order
    pub fn iter(&self) -> impl Iterator<Item = (TankId, &Tank)> {
        self.tanks.iter().map(|(&id, tank)| (id, tank))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TankId, &mut Tank)> {
        self.tanks.iter_mut().map(|(&id, tank)| (id, tank))
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tanks.clear();
    }
}
