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

//! Base capture: per-turn reset off base, per-round point award
//!
//! Capture is locked whenever all three factions contest the base: points
//! accrue only while at most two distinct owners have tanks on base hexes.

use std::collections::BTreeSet;

use crate::map::{GameMap, HexKind};
use crate::tank::TankRegistry;

/// Owners-on-base threshold above which nobody captures
const CONTEST_LIMIT: usize = 2;

#[derive(Default)]
pub struct BaseCaptureSystem;

impl BaseCaptureSystem {
    pub fn new() -> Self {
        Self
    }

    /// Per-turn tick: a tank that is not standing on a base loses its
    /// accrued capture points
    pub fn turn(&self, tanks: &mut TankRegistry, map: &GameMap) {
        for (_, tank) in tanks.iter_mut() {
            if map.kind_at(tank.position.current) != HexKind::Base {
                tank.capture.points = 0;
            }
        }
    }

    /// Per-round tick: every tank on a base gains a point, unless the base
    /// is contested by more than two owners
    pub fn round(&self, tanks: &mut TankRegistry, map: &GameMap) {
        let mut owners = BTreeSet::new();
        let mut capturing = Vec::new();
        for (id, tank) in tanks.iter() {
            if map.kind_at(tank.position.current) == HexKind::Base {
                owners.insert(tank.owner);
                capturing.push(id);
            }
        }
        if owners.len() > CONTEST_LIMIT {
            return;
        }
        for id in capturing {
            if let Some(tank) = tanks.get_mut(id) {
                tank.capture.points += 1;
            }
        }
    }
}
