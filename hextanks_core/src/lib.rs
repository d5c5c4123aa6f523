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

#![forbid(unsafe_code)]

//! Game core for the HexTanks client
//!
//! Keeps a deterministic local mirror of the server's game state - the hex
//! board, every vehicle with its components, and the per-round bookkeeping
//! rules - and plans the actions for the five tanks we control each turn.
//! The core performs no I/O; the session layer feeds it server payloads and
//! carries its decisions back out.

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod bot;
pub mod event;
pub mod hex;
pub mod map;
pub mod player;
pub mod protocol;
pub mod system;
pub mod tank;
pub mod world;

/// Refers to a player
///
/// Assigned by the server at login and stable for the whole game.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl From<u32> for PlayerId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
impl Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl FromStr for PlayerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Refers to a vehicle
///
/// Vehicle ids come from the server's `vehicles` dictionary; ownership
/// relations use ids, never object identity.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TankId(u32);

impl From<u32> for TankId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
impl Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl FromStr for TankId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        assert_eq!("17".parse::<TankId>().unwrap(), TankId::from(17));
        assert_eq!(PlayerId::from(3).to_string(), "3");
        assert!("tank".parse::<TankId>().is_err());
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&TankId::from(5)).unwrap(), "5");
        assert_eq!(serde_json::from_str::<PlayerId>("2").unwrap(), PlayerId::from(2));
    }
}
