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

//! Framed transport to the game server
//!
//! Every request and response is `uint32_le code | uint32_le length |
//! payload_utf8_json`; the code is an action on the way out and a result
//! on the way back.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use tracing::trace;

use hextanks_core::protocol::ActionCode;

const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// A raw response frame: result code plus undecoded payload bytes
pub struct RawResponse {
    pub code: u32,
    pub payload: Vec<u8>,
}

/// A blocking socket speaking the framed protocol
pub struct ServerConnection {
    stream: TcpStream,
}

impl ServerConnection {
    pub fn connect(address: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(address)?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Sends one request frame and reads the matching response frame
    pub fn request(&mut self, action: ActionCode, payload: &[u8]) -> io::Result<RawResponse> {
        trace!(action = ?action, payload_len = payload.len(), "sending request");
        let mut frame = Vec::with_capacity(8 + payload.len());
        frame.extend_from_slice(&action.code().to_le_bytes());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(payload);
        self.stream.write_all(&frame)?;

        let mut header = [0u8; 8];
        self.stream.read_exact(&mut header)?;
        let code = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let length = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        let mut body = vec![0u8; length as usize];
        self.stream.read_exact(&mut body)?;
        trace!(code, payload_len = length, "received response");
        Ok(RawResponse {
            code,
            payload: body,
        })
    }
}

/// Builds the 8-byte frame header for a payload
#[cfg(test)]
fn frame_header(code: u32, payload_len: u32) -> [u8; 8] {
    let mut header = [0u8; 8];
    header[..4].copy_from_slice(&code.to_le_bytes());
    header[4..].copy_from_slice(&payload_len.to_le_bytes());
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_header_is_two_little_endian_words() {
        let header = frame_header(ActionCode::Shoot.code(), 47);
        assert_eq!(&header[..4], &[102, 0, 0, 0]);
        assert_eq!(&header[4..], &[47, 0, 0, 0]);
    }

    #[test]
    fn requests_round_trip_over_a_local_socket() {
        use std::net::TcpListener;
        use std::thread;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        // a one-shot server: expects a LOGIN frame, answers OK with a body
        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut header = [0u8; 8];
            socket.read_exact(&mut header).unwrap();
            let code = u32::from_le_bytes(header[..4].try_into().unwrap());
            let length = u32::from_le_bytes(header[4..].try_into().unwrap());
            assert_eq!(code, 1);
            let mut body = vec![0u8; length as usize];
            socket.read_exact(&mut body).unwrap();
            assert_eq!(body, br#"{"name":"player"}"#);

            let reply = br#"{"idx":1}"#;
            socket.write_all(&frame_header(0, reply.len() as u32)).unwrap();
            socket.write_all(reply).unwrap();
        });

        let mut connection = ServerConnection::connect(&address).unwrap();
        let response = connection
            .request(ActionCode::Login, br#"{"name":"player"}"#)
            .unwrap();
        assert_eq!(response.code, 0);
        assert_eq!(response.payload, br#"{"idx":1}"#);
        server.join().unwrap();
    }

    #[test]
    fn empty_payloads_send_a_zero_length() {
        use std::net::TcpListener;
        use std::thread;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut header = [0u8; 8];
            socket.read_exact(&mut header).unwrap();
            assert_eq!(u32::from_le_bytes(header[..4].try_into().unwrap()), 6);
            assert_eq!(u32::from_le_bytes(header[4..].try_into().unwrap()), 0);
            socket.write_all(&frame_header(0, 0)).unwrap();
        });

        let mut connection = ServerConnection::connect(&address).unwrap();
        let response = connection.request(ActionCode::Turn, &[]).unwrap();
        assert_eq!(response.code, 0);
        assert!(response.payload.is_empty());
        server.join().unwrap();
    }
}
