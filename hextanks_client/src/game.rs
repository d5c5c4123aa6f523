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

//! The game loop: plays our turns, replays everyone else's, and keeps the
//! local mirror in step with the server
//!
//! Recovery policy: a server-side timeout retries the loop iteration, a
//! desync (`InappropriateGameState`, `InternalServerError`) rebuilds the
//! mirror from a fresh snapshot, a rejected command skips the action and
//! rebuilds, and an access denial aborts the game.

use tracing::{debug, info, warn};

use hextanks_core::PlayerId;
use hextanks_core::bot::{Bot, BotConfig, PlannedAction};
use hextanks_core::protocol::{ActionCode, ActionRequest, GameStatePayload, LoginRequest};
use hextanks_core::world::World;

use crate::session::{PlayerSession, SessionError};

pub struct Game {
    session: PlayerSession,
    world: World,
    bot: Bot,
    player_id: PlayerId,
    state: GameStatePayload,
    previous_player: Option<PlayerId>,
}

impl Game {
    /// Logs in, pulls the map and the first snapshot, and builds the
    /// mirror and the planner
    pub fn new(mut session: PlayerSession, login: &LoginRequest) -> Result<Self, SessionError> {
        let player_id = session.login(login)?;
        info!(player = %player_id, "logged in");
        let map_payload = session.map()?;
        let state = session.game_state()?;
        let world = World::new(&map_payload, &state);
        let bot = Bot::new(world.map(), world.pathing(), BotConfig::default());
        let mut game = Self {
            session,
            world,
            bot,
            player_id,
            state,
            previous_player: None,
        };
        game.tick();
        Ok(game)
    }

    /// Plays until the last round is done; returns whether we won
    pub fn run(&mut self) -> Result<bool, SessionError> {
        loop {
            self.play()?;
            if self.state.current_round != self.state.num_rounds {
                // more rounds to go: vote the next one in and start fresh
                if let Err(error) = self.session.force_turn() {
                    debug!(%error, "turn vote between rounds failed");
                }
                self.resync()?;
            } else {
                break;
            }
        }
        if let Err(error) = self.session.chat("gg") {
            debug!(%error, "parting chat message failed");
        }
        Ok(self.state.winner == Some(self.player_id))
    }

    pub fn logout(&mut self) {
        if let Err(error) = self.session.logout() {
            debug!(%error, "logout failed");
        }
    }

    /// One full game, with the recovery policy applied per iteration
    fn play(&mut self) -> Result<(), SessionError> {
        while !self.state.finished {
            match self.step() {
                Ok(()) => {}
                Err(SessionError::Timeout(message)) => {
                    debug!(%message, "server-side timeout; re-reading state");
                }
                Err(error @ SessionError::InappropriateGameState(_))
                | Err(error @ SessionError::InternalServerError(_)) => {
                    debug!(%error, "desync; rebuilding from a snapshot");
                    self.resync()?;
                }
                Err(SessionError::BadCommand(message)) => {
                    debug!(%message, "command rejected; skipping it");
                    if let Err(error) = self.session.force_turn() {
                        debug!(%error, "turn vote after rejected command failed");
                    }
                    self.resync()?;
                }
                Err(error) => return Err(error),
            }
        }
        self.log_summary();
        Ok(())
    }

    /// One loop iteration: act or observe, then refresh the state and run
    /// the turn/round ticks
    fn step(&mut self) -> Result<(), SessionError> {
        let current = self.state.current_player_idx;
        if current != self.previous_player {
            self.previous_player = current;
            let our_turn = current == Some(self.player_id)
                && self.world.players().get(self.player_id).is_some();
            if our_turn {
                self.play_own_turn()?;
            } else {
                self.observe_turn()?;
            }
        } else {
            // the turn has not advanced yet; keep voting
            self.session.force_turn()?;
        }

        self.state = self.session.game_state()?;
        self.tick();
        Ok(())
    }

    /// Plans the five tanks' actions, sends each to the server, and
    /// mirrors it locally
    fn play_own_turn(&mut self) -> Result<(), SessionError> {
        let plan = self.bot.plan_turn(&mut self.world, self.player_id);
        for action in plan {
            match action {
                PlannedAction::Move { tank, to } => {
                    self.session.send_move(&ActionRequest {
                        vehicle_id: tank,
                        target: to,
                    })?;
                    if let Err(error) = self.world.apply_move(tank, to) {
                        warn!(%error, "planned move failed against the mirror");
                    }
                }
                PlannedAction::Shoot { tank, target } => {
                    self.session.send_shoot(&ActionRequest {
                        vehicle_id: tank,
                        target,
                    })?;
                    if let Err(error) = self.world.apply_shoot(tank, target) {
                        warn!(%error, "planned shot failed against the mirror");
                    }
                }
            }
        }
        self.session.force_turn()
    }

    /// Replays the acting player's reported actions into the mirror
    fn observe_turn(&mut self) -> Result<(), SessionError> {
        self.session.force_turn()?;
        let actions = self.session.game_actions()?;
        for action in actions.actions {
            if action.player_id == self.player_id {
                // everything from here on is our own echo
                break;
            }
            match ActionCode::from_code(action.action_type) {
                Some(ActionCode::Move) => {
                    if let Err(error) =
                        self.world.apply_move(action.data.vehicle_id, action.data.target)
                    {
                        warn!(%error, "reported move failed against the mirror");
                    }
                }
                Some(ActionCode::Shoot) => {
                    if let Err(error) =
                        self.world.apply_shoot(action.data.vehicle_id, action.data.target)
                    {
                        warn!(%error, "reported shot failed against the mirror");
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Start-of-turn bookkeeping, plus the round tick when everyone has
    /// acted
    fn tick(&mut self) {
        self.world.turn(&self.state);
        if self.state.num_players > 0 && self.state.current_turn % self.state.num_players == 0 {
            self.world.round();
        }
    }

    /// Rebuilds the mirror and the planner from a fresh snapshot
    fn resync(&mut self) -> Result<(), SessionError> {
        self.previous_player = None;
        self.state = self.session.game_state()?;
        self.world.reset(&self.state);
        self.bot.reset(self.world.map(), self.world.pathing());
        self.tick();
        Ok(())
    }

    fn log_summary(&self) {
        for player in self.world.players().players() {
            info!(
                player = %player.id(),
                name = player.name(),
                capture = player.capture_points(),
                kills = player.destruction_points(),
                "final score"
            );
        }
        match self.state.winner {
            Some(winner) => info!(%winner, "game finished"),
            None => info!("game finished with no winner"),
        }
    }
}
