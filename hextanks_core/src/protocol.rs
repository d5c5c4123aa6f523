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

//! Payload types for the framed JSON protocol
//!
//! Requests and responses travel as `uint32_le action | uint32_le length |
//! payload` frames; this module defines the action and result codes and the
//! serde types for every payload body the client exchanges. The session
//! layer owns the framing itself.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::hex::CubePosition;
use crate::tank::TankArchetype;
use crate::{PlayerId, TankId};

/// Request action codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCode {
    Login,
    Logout,
    Map,
    GameState,
    GameActions,
    Turn,
    Chat,
    Move,
    Shoot,
}

impl ActionCode {
    pub fn code(self) -> u32 {
        match self {
            Self::Login => 1,
            Self::Logout => 2,
            Self::Map => 3,
            Self::GameState => 4,
            Self::GameActions => 5,
            Self::Turn => 6,
            Self::Chat => 100,
            Self::Move => 101,
            Self::Shoot => 102,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Login),
            2 => Some(Self::Logout),
            3 => Some(Self::Map),
            4 => Some(Self::GameState),
            5 => Some(Self::GameActions),
            6 => Some(Self::Turn),
            100 => Some(Self::Chat),
            101 => Some(Self::Move),
            102 => Some(Self::Shoot),
            _ => None,
        }
    }
}

/// Response result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Okay,
    BadCommand,
    AccessDenied,
    InappropriateGameState,
    Timeout,
    InternalServerError,
}

impl ResultCode {
    pub fn code(self) -> u32 {
        match self {
            Self::Okay => 0,
            Self::BadCommand => 1,
            Self::AccessDenied => 2,
            Self::InappropriateGameState => 3,
            Self::Timeout => 4,
            Self::InternalServerError => 500,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Okay),
            1 => Some(Self::BadCommand),
            2 => Some(Self::AccessDenied),
            3 => Some(Self::InappropriateGameState),
            4 => Some(Self::Timeout),
            500 => Some(Self::InternalServerError),
            _ => None,
        }
    }
}

/// LOGIN request body
///
/// Only `name` is required; every absent option leaves the server default in
/// effect.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_turns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_players: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_full: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_observer: Option<bool>,
}

/// LOGIN response body; the server echoes more, but only the assigned index
/// matters
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub idx: PlayerId,
}

/// CHAT request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// MOVE and SHOOT request body; also the `data` of a replayed game action
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActionRequest {
    pub vehicle_id: TankId,
    pub target: CubePosition,
}

/// MAP response body
#[derive(Debug, Clone, Deserialize)]
pub struct MapPayload {
    pub size: i32,
    pub name: String,
    #[serde(default)]
    pub spawn_points: Vec<BTreeMap<String, Vec<CubePosition>>>,
    pub content: MapContent,
}

/// Coordinate lists for every special hex kind
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapContent {
    #[serde(default)]
    pub base: Vec<CubePosition>,
    #[serde(default)]
    pub obstacle: Vec<CubePosition>,
    #[serde(default)]
    pub catapult: Vec<CubePosition>,
    #[serde(default)]
    pub light_repair: Vec<CubePosition>,
    #[serde(default)]
    pub hard_repair: Vec<CubePosition>,
}

/// GAME_STATE response body, the read-only input that drives the local
/// mirror
#[derive(Debug, Clone, Deserialize)]
pub struct GameStatePayload {
    pub num_players: u32,
    pub num_turns: u32,
    #[serde(default)]
    pub num_rounds: u32,
    pub current_turn: u32,
    #[serde(default)]
    pub current_round: u32,
    #[serde(default)]
    pub current_player_idx: Option<PlayerId>,
    pub finished: bool,
    #[serde(default)]
    pub winner: Option<PlayerId>,
    #[serde(default)]
    pub players: Vec<PlayerPayload>,
    #[serde(default)]
    pub observers: Vec<PlayerPayload>,
    #[serde(default, deserialize_with = "string_keyed")]
    pub vehicles: BTreeMap<TankId, VehiclePayload>,
    #[serde(default, deserialize_with = "string_keyed")]
    pub attack_matrix: BTreeMap<PlayerId, Vec<PlayerId>>,
    #[serde(default, deserialize_with = "string_keyed")]
    pub win_points: BTreeMap<PlayerId, WinPointsPayload>,
    #[serde(default)]
    pub catapult_usage: Vec<CubePosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerPayload {
    pub idx: PlayerId,
    pub name: String,
    #[serde(default)]
    pub is_observer: bool,
}

/// One entry of the server's `vehicles` dictionary
#[derive(Debug, Clone, Deserialize)]
pub struct VehiclePayload {
    pub player_id: PlayerId,
    pub vehicle_type: TankArchetype,
    pub health: i32,
    pub spawn_position: CubePosition,
    pub position: CubePosition,
    #[serde(default)]
    pub capture_points: i32,
    #[serde(default)]
    pub shoot_range_bonus: i32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WinPointsPayload {
    #[serde(default)]
    pub capture: i32,
    #[serde(default)]
    pub kill: i32,
}

/// GAME_ACTIONS response body: what the other players did last turn
#[derive(Debug, Clone, Deserialize)]
pub struct GameActionsPayload {
    #[serde(default)]
    pub actions: Vec<GameAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameAction {
    pub player_id: PlayerId,
    pub action_type: u32,
    pub data: ActionRequest,
}

/// Error body attached to every non-zero result code
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error_message: String,
}

/// Deserializes a JSON object whose keys are numeric ids encoded as strings
/// (`vehicles`, `attack_matrix`, `win_points`)
fn string_keyed<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: FromStr + Ord,
    K::Err: Display,
    V: Deserialize<'de>,
{
    let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| key.parse().map(|key| (key, value)).map_err(de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_protocol_tables() {
        assert_eq!(ActionCode::Login.code(), 1);
        assert_eq!(ActionCode::Chat.code(), 100);
        assert_eq!(ActionCode::Shoot.code(), 102);
        assert_eq!(ActionCode::from_code(101), Some(ActionCode::Move));
        assert_eq!(ActionCode::from_code(7), None);
        assert_eq!(ResultCode::InternalServerError.code(), 500);
        assert_eq!(ResultCode::from_code(3), Some(ResultCode::InappropriateGameState));
        assert_eq!(ResultCode::from_code(42), None);
    }

    #[test]
    fn action_request_matches_the_wire_shape() {
        let request = ActionRequest {
            vehicle_id: TankId::from(5),
            target: CubePosition::new(-1, 1, 0),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"vehicle_id":5,"target":{"x":-1,"y":1,"z":0}}"#
        );
    }

    #[test]
    fn login_request_omits_absent_options() {
        let request = LoginRequest {
            name: "player".to_owned(),
            password: None,
            game: Some("test_game".to_owned()),
            num_turns: Some(45),
            num_players: Some(3),
            is_full: Some(true),
            is_observer: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["name"], "player");
        assert_eq!(value["num_players"], 3);
        assert!(value.get("password").is_none());
        assert!(value.get("is_observer").is_none());
    }

    #[test]
    fn game_state_parses_string_keyed_dictionaries() {
        let state: GameStatePayload = serde_json::from_value(serde_json::json!({
            "num_players": 3,
            "num_turns": 45,
            "num_rounds": 15,
            "current_turn": 6,
            "current_round": 2,
            "current_player_idx": 1,
            "finished": false,
            "winner": null,
            "players": [{"idx": 1, "name": "one", "is_observer": false}],
            "observers": [],
            "vehicles": {
                "4": {
                    "player_id": 1,
                    "vehicle_type": "medium_tank",
                    "health": 2,
                    "spawn_position": {"x": -7, "y": 7, "z": 0},
                    "position": {"x": 0, "y": 1, "z": -1},
                    "capture_points": 1,
                    "shoot_range_bonus": 0
                }
            },
            "attack_matrix": {"1": [2], "2": [], "3": []},
            "win_points": {"1": {"capture": 1, "kill": 2}},
            "catapult_usage": [{"x": 0, "y": -2, "z": 2}]
        }))
        .unwrap();

        let vehicle = &state.vehicles[&TankId::from(4)];
        assert_eq!(vehicle.vehicle_type, TankArchetype::MediumTank);
        assert_eq!(vehicle.position, CubePosition::new(0, 1, -1));
        assert_eq!(
            state.attack_matrix[&PlayerId::from(1)],
            vec![PlayerId::from(2)]
        );
        assert_eq!(state.win_points[&PlayerId::from(1)].kill, 2);
        assert_eq!(state.catapult_usage.len(), 1);
        assert_eq!(state.current_player_idx, Some(PlayerId::from(1)));
        assert_eq!(state.winner, None);
    }

    #[test]
    fn bad_string_keys_are_an_error() {
        let result = serde_json::from_value::<GameStatePayload>(serde_json::json!({
            "num_players": 1,
            "num_turns": 1,
            "current_turn": 0,
            "finished": false,
            "vehicles": {},
            "attack_matrix": {"not_a_number": []},
            "win_points": {}
        }));
        assert!(result.is_err());
    }
}
