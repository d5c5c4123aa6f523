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

//! The player's session: typed requests over the framed transport, with
//! result codes mapped onto the error taxonomy

use thiserror::Error;

use hextanks_core::PlayerId;
use hextanks_core::protocol::{
    ActionCode, ActionRequest, ChatRequest, ErrorPayload, GameActionsPayload, GameStatePayload,
    LoginRequest, LoginResponse, MapPayload, ResultCode,
};

use crate::connection::ServerConnection;

/// Everything a server exchange can fail with
///
/// The first five variants mirror the server's non-zero result codes and
/// carry its `error_message`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("bad command: {0}")]
    BadCommand(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("inappropriate game state: {0}")]
    InappropriateGameState(String),
    #[error("server-side timeout: {0}")]
    Timeout(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
    #[error("protocol violation: {0}")]
    Protocol(String),
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// A logged-in (or logging-in) player's view of the server
pub struct PlayerSession {
    connection: ServerConnection,
}

impl PlayerSession {
    pub fn connect(address: &str) -> Result<Self, SessionError> {
        Ok(Self {
            connection: ServerConnection::connect(address)?,
        })
    }

    /// One request/response exchange; non-zero result codes become errors
    fn call(
        &mut self,
        action: ActionCode,
        payload: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, SessionError> {
        let body = payload.unwrap_or_default();
        let response = self.connection.request(action, &body)?;
        match ResultCode::from_code(response.code) {
            Some(ResultCode::Okay) => Ok(response.payload),
            Some(code) => {
                let message = serde_json::from_slice::<ErrorPayload>(&response.payload)
                    .unwrap_or_default()
                    .error_message;
                Err(match code {
                    ResultCode::BadCommand => SessionError::BadCommand(message),
                    ResultCode::AccessDenied => SessionError::AccessDenied(message),
                    ResultCode::InappropriateGameState => {
                        SessionError::InappropriateGameState(message)
                    }
                    ResultCode::Timeout => SessionError::Timeout(message),
                    ResultCode::InternalServerError => SessionError::InternalServerError(message),
                    ResultCode::Okay => unreachable!("okay is handled above"),
                })
            }
            None => Err(SessionError::Protocol(format!(
                "unknown result code {}",
                response.code
            ))),
        }
    }

    /// Logs in and returns the index the server assigned us
    pub fn login(&mut self, request: &LoginRequest) -> Result<PlayerId, SessionError> {
        let payload = self.call(ActionCode::Login, Some(serde_json::to_vec(request)?))?;
        let response: LoginResponse = serde_json::from_slice(&payload)?;
        Ok(response.idx)
    }

    /// Removes our record from the server storage
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.call(ActionCode::Logout, None).map(|_| ())
    }

    /// Static map information
    pub fn map(&mut self) -> Result<MapPayload, SessionError> {
        let payload = self.call(ActionCode::Map, None)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    /// The evolving game state, updated at the end of every turn
    pub fn game_state(&mut self) -> Result<GameStatePayload, SessionError> {
        let payload = self.call(ActionCode::GameState, None)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    /// What happened during the previous turn
    pub fn game_actions(&mut self) -> Result<GameActionsPayload, SessionError> {
        let payload = self.call(ActionCode::GameActions, None)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    /// Votes to advance the game to the next turn without waiting out the
    /// time slice
    pub fn force_turn(&mut self) -> Result<(), SessionError> {
        self.call(ActionCode::Turn, None).map(|_| ())
    }

    /// Does nothing useful; kept for testing and fun
    pub fn chat(&mut self, message: &str) -> Result<(), SessionError> {
        let request = ChatRequest {
            message: message.to_owned(),
        };
        self.call(ActionCode::Chat, Some(serde_json::to_vec(&request)?))
            .map(|_| ())
    }

    pub fn send_move(&mut self, request: &ActionRequest) -> Result<(), SessionError> {
        self.call(ActionCode::Move, Some(serde_json::to_vec(request)?))
            .map(|_| ())
    }

    pub fn send_shoot(&mut self, request: &ActionRequest) -> Result<(), SessionError> {
        self.call(ActionCode::Shoot, Some(serde_json::to_vec(request)?))
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves scripted `(result_code, body)` responses on a local socket
    fn scripted_server(responses: Vec<(u32, &'static [u8])>) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            for (code, body) in responses {
                let mut header = [0u8; 8];
                socket.read_exact(&mut header).unwrap();
                let length = u32::from_le_bytes(header[4..].try_into().unwrap());
                let mut request_body = vec![0u8; length as usize];
                socket.read_exact(&mut request_body).unwrap();

                let mut reply = Vec::new();
                reply.extend_from_slice(&code.to_le_bytes());
                reply.extend_from_slice(&(body.len() as u32).to_le_bytes());
                reply.extend_from_slice(body);
                socket.write_all(&reply).unwrap();
            }
        });
        (address, handle)
    }

    #[test]
    fn login_returns_the_assigned_index() {
        let (address, server) = scripted_server(vec![(0, br#"{"idx": 2, "name": "player"}"#)]);
        let mut session = PlayerSession::connect(&address).unwrap();
        let request = LoginRequest {
            name: "player".to_owned(),
            password: None,
            game: None,
            num_turns: None,
            num_players: None,
            is_full: None,
            is_observer: None,
        };
        assert_eq!(session.login(&request).unwrap(), PlayerId::from(2));
        server.join().unwrap();
    }

    #[test]
    fn result_codes_map_onto_the_error_taxonomy() {
        let (address, server) = scripted_server(vec![
            (2, br#"{"error_message": "wrong password"}"#),
            (3, br#"{"error_message": "no game"}"#),
            (4, b""),
        ]);
        let mut session = PlayerSession::connect(&address).unwrap();

        match session.force_turn() {
            Err(SessionError::AccessDenied(message)) => assert_eq!(message, "wrong password"),
            other => panic!("expected access denied, got {other:?}"),
        }
        match session.force_turn() {
            Err(SessionError::InappropriateGameState(message)) => assert_eq!(message, "no game"),
            other => panic!("expected inappropriate game state, got {other:?}"),
        }
        // an empty error body still maps, with an empty message
        match session.force_turn() {
            Err(SessionError::Timeout(message)) => assert_eq!(message, ""),
            other => panic!("expected timeout, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn unknown_result_codes_are_protocol_violations() {
        let (address, server) = scripted_server(vec![(99, b"")]);
        let mut session = PlayerSession::connect(&address).unwrap();
        assert!(matches!(
            session.force_turn(),
            Err(SessionError::Protocol(_))
        ));
        server.join().unwrap();
    }
}
