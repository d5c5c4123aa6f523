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

//! The action planner
//!
//! Each turn the planner backtracks over the owned tanks in acting order.
//! At every depth the frontier is the heuristically best single move, every
//! shot that still deals fresh damage, and doing nothing. Moves are applied
//! to the world mirror and undone on the way back; damage stays
//! hypothetical in a ledger. A leaf scores the movers' destination values
//! plus what the accumulated damage buys (kills, denied capture, raw
//! damage), and the best-scoring plan's actions are returned.
//!
//! The single-move frontier is deliberate pruning: exploring every
//! movement option at every depth is exponential, while one
//! heuristic-best destination per tank keeps the search at
//! `O((shots + 2)^5)` per turn.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use tracing::debug;

use crate::hex::{CubeOffset, CubePosition, PathingOffsets};
use crate::map::{GameMap, HexKind};
use crate::tank::Tank;
use crate::world::World;
use crate::{PlayerId, TankId};

/// Immutable heuristic weights, fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct BotConfig {
    /// Seed value of a base hex in the static value map
    pub capture_base_value: f64,
    /// Per-step decay of base value spreading outward
    pub capture_distance_multiplier: f64,
    /// How strongly expected health loss discounts a hex
    pub health_percent_loss_multiplier: f64,
    /// Flat bonus per missing hit point for standing on matching repair
    /// terrain
    pub repair_position_bonus: f64,
    /// Flat bonus for standing on a charged catapult without a bonus
    pub catapult_position_bonus: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            capture_base_value: 1.0,
            capture_distance_multiplier: 0.95,
            health_percent_loss_multiplier: 0.1,
            repair_position_bonus: 0.5,
            catapult_position_bonus: 0.5,
        }
    }
}

/// One concrete action of the winning plan, in acting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    Move { tank: TankId, to: CubePosition },
    Shoot { tank: TankId, target: CubePosition },
}

/// Base proximity data for one traversable hex
struct BaseField {
    /// Combined decayed base value; reachability from several bases
    /// reinforces multiplicatively while preserving the maximum
    value: f64,
    /// Breadth-first depth to the nearest base through traversable terrain
    depth: u32,
}

/// Plans the controlled tanks' actions each turn
pub struct Bot {
    config: BotConfig,
    base_map: BTreeMap<CubePosition, BaseField>,
    bases: Vec<CubePosition>,
}

enum Step {
    Move {
        tank: TankId,
        to: CubePosition,
        value: f64,
    },
    Shoot {
        tank: TankId,
        target: CubePosition,
    },
    Skip,
}

type ThreatMaps = Rc<Vec<HashMap<CubePosition, i32>>>;

struct SearchState {
    player: PlayerId,
    order: Vec<TankId>,
    /// Hypothetical damage dealt by the plan so far, per enemy tank
    ledger: BTreeMap<TankId, i32>,
    steps: Vec<Step>,
    best_score: f64,
    best_plan: Vec<PlannedAction>,
    /// Threat maps memoized by the set of ledger-dead enemies
    threat_cache: HashMap<Vec<TankId>, ThreatMaps>,
}

impl Bot {
    pub fn new(map: &GameMap, offsets: &PathingOffsets, config: BotConfig) -> Self {
        let (base_map, bases) = Self::build_base_map(map, offsets, &config);
        Self {
            config,
            base_map,
            bases,
        }
    }

    /// Drops per-game caches and rebuilds the static value map
    pub fn reset(&mut self, map: &GameMap, offsets: &PathingOffsets) {
        let (base_map, bases) = Self::build_base_map(map, offsets, &self.config);
        self.base_map = base_map;
        self.bases = bases;
    }

    fn build_base_map(
        map: &GameMap,
        offsets: &PathingOffsets,
        config: &BotConfig,
    ) -> (BTreeMap<CubePosition, BaseField>, Vec<CubePosition>) {
        let bases: Vec<CubePosition> = map
            .special_hexes()
            .filter(|&(_, kind)| kind == HexKind::Base)
            .map(|(position, _)| position)
            .collect();
        let mut base_map = BTreeMap::new();
        for &base in &bases {
            Self::spread_base_value(map, offsets, base, config, &mut base_map);
        }
        (base_map, bases)
    }

    /// Breadth-first sweep outward from one base, decaying its value per
    /// step and merging with what other bases already contributed
    fn spread_base_value(
        map: &GameMap,
        offsets: &PathingOffsets,
        origin: CubePosition,
        config: &BotConfig,
        base_map: &mut BTreeMap<CubePosition, BaseField>,
    ) {
        let mut visited = BTreeSet::new();
        visited.insert(CubeOffset::new(0, 0, 0));
        merge(base_map, origin, config.capture_base_value, 0);

        for distance in 1..=offsets.max_distance() {
            for (&offset, sources) in offsets.ring(distance) {
                if !sources.iter().any(|source| visited.contains(source)) {
                    continue;
                }
                let position = origin + offset;
                if !position.in_bounds(map.size()) {
                    continue;
                }
                if !map.kind_at(position).is_traversable() {
                    continue;
                }
                visited.insert(offset);
                let value = config.capture_base_value
                    * config.capture_distance_multiplier.powi(distance as i32);
                merge(base_map, position, value, distance);
            }
        }

        fn merge(
            base_map: &mut BTreeMap<CubePosition, BaseField>,
            position: CubePosition,
            value: f64,
            depth: u32,
        ) {
            base_map
                .entry(position)
                .and_modify(|field| {
                    field.value = value.max(field.value * value);
                    field.depth = field.depth.min(depth);
                })
                .or_insert(BaseField { value, depth });
        }
    }

    /// Decides the controlled tanks' actions for this turn
    ///
    /// Temporarily applies candidate moves to the world and undoes them;
    /// the world is back in its entry state when this returns.
    pub fn plan_turn(&self, world: &mut World, player: PlayerId) -> Vec<PlannedAction> {
        let Some(order) = world
            .players()
            .get(player)
            .map(|p| p.tank_ids().collect::<Vec<_>>())
        else {
            return Vec::new();
        };
        let mut state = SearchState {
            player,
            order,
            ledger: BTreeMap::new(),
            steps: Vec::new(),
            best_score: f64::NEG_INFINITY,
            best_plan: Vec::new(),
            threat_cache: HashMap::new(),
        };
        self.search(world, &mut state, 0);
        debug!(
            player = %player,
            score = state.best_score,
            actions = state.best_plan.len(),
            "turn planned"
        );
        state.best_plan
    }

    fn search(&self, world: &mut World, state: &mut SearchState, depth: usize) {
        if depth == state.order.len() {
            self.score_leaf(world, state);
            return;
        }
        let id = state.order[depth];
        let alive = world.tanks().get(id).is_some_and(|tank| tank.alive);

        if alive {
            // the single heuristically best destination
            let from = world.tanks().get(id).map(|tank| tank.position.current);
            if let (Some(from), Some((to, value))) = (from, self.best_move(world, state, id)) {
                if world.apply_move(id, to).is_ok() {
                    state.steps.push(Step::Move { tank: id, to, value });
                    self.search(world, state, depth + 1);
                    state.steps.pop();
                    let _ = world.apply_move(id, from);
                }
            }

            // every shot that still deals fresh damage
            let damage = world
                .tanks()
                .get(id)
                .map(|tank| tank.shooting.damage())
                .unwrap_or(0);
            for (target, hit_ids) in world.shooting_options(id).unwrap_or_default() {
                let mut hits = Vec::new();
                for hit in hit_ids {
                    let Some(tank) = world.tanks().get(hit) else {
                        continue;
                    };
                    let dealt = state.ledger.get(&hit).copied().unwrap_or(0);
                    let effective = damage.min(tank.health.current - dealt);
                    if effective > 0 {
                        hits.push((hit, effective));
                    }
                }
                if hits.is_empty() {
                    continue;
                }
                for &(hit, effective) in &hits {
                    *state.ledger.entry(hit).or_insert(0) += effective;
                }
                state.steps.push(Step::Shoot { tank: id, target });
                self.search(world, state, depth + 1);
                state.steps.pop();
                for &(hit, effective) in &hits {
                    if let Some(dealt) = state.ledger.get_mut(&hit) {
                        *dealt -= effective;
                        if *dealt == 0 {
                            state.ledger.remove(&hit);
                        }
                    }
                }
            }
        }

        // doing nothing is always on the frontier
        state.steps.push(Step::Skip);
        self.search(world, state, depth + 1);
        state.steps.pop();
    }

    /// The best movement option by heuristic value, if it is at least as
    /// good as standing still
    fn best_move(
        &self,
        world: &World,
        state: &mut SearchState,
        id: TankId,
    ) -> Option<(CubePosition, f64)> {
        let options = world.movement_options(id).ok()?;
        if options.is_empty() {
            return None;
        }
        let threats = self.team_threats(world, state);
        let tank = world.tanks().get(id)?;
        let current_value =
            self.heuristic_value(world, tank, &threats, tank.position.current);

        let mut best: Option<(CubePosition, f64)> = None;
        for position in options {
            let value = self.heuristic_value(world, tank, &threats, position);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((position, value));
            }
        }
        best.filter(|&(_, value)| value >= current_value)
    }

    /// Per-enemy-team damage fields over every hex their tanks can target,
    /// with ledger-dead enemies excluded
    fn team_threats(&self, world: &World, state: &mut SearchState) -> ThreatMaps {
        let killed: Vec<TankId> = state
            .ledger
            .iter()
            .filter(|&(&id, &dealt)| {
                world
                    .tanks()
                    .get(id)
                    .is_some_and(|tank| tank.health.current <= dealt)
            })
            .map(|(&id, _)| id)
            .collect();
        if let Some(cached) = state.threat_cache.get(&killed) {
            return cached.clone();
        }

        let mut teams: BTreeMap<PlayerId, Vec<TankId>> = BTreeMap::new();
        for (id, tank) in world.tanks().iter() {
            if tank.owner == state.player || !tank.alive || killed.contains(&id) {
                continue;
            }
            teams.entry(tank.owner).or_default().push(id);
        }

        let maps: Vec<HashMap<CubePosition, i32>> = teams
            .values()
            .map(|members| {
                let mut field = HashMap::new();
                for &member in members {
                    let Some(tank) = world.tanks().get(member) else {
                        continue;
                    };
                    let damage = tank.shooting.damage();
                    if let Ok(positions) = world.shootable_positions(member) {
                        for position in positions {
                            *field.entry(position).or_insert(0) += damage;
                        }
                    }
                }
                field
            })
            .collect();

        let maps = Rc::new(maps);
        state.threat_cache.insert(killed, maps.clone());
        maps
    }

    /// Value of one candidate hex for one tank: base proximity, position
    /// bonuses, then the enemy threat factor
    fn heuristic_value(
        &self,
        world: &World,
        tank: &Tank,
        threats: &[HashMap<CubePosition, i32>],
        hex: CubePosition,
    ) -> f64 {
        let kind = world.map().kind_at(hex);
        let repair_hex = tank.archetype.repair_kind() == Some(kind);

        let mut value = if kind == HexKind::Base {
            2.0
        } else {
            match self.base_map.get(&hex) {
                Some(field) if field.depth > 0 => 1.0 / f64::from(field.depth),
                Some(_) => 2.0,
                // cut off from every base; fall back to the crow-flies
                // distance
                None => match self
                    .bases
                    .iter()
                    .map(|base| hex.distance_to(*base))
                    .min()
                {
                    Some(0) => 2.0,
                    Some(distance) => 1.0 / f64::from(distance),
                    None => 0.0,
                },
            }
        };

        if repair_hex {
            value += self.config.repair_position_bonus
                * f64::from(tank.health.max - tank.health.current);
        }
        if kind == HexKind::Catapult
            && world.catapult_uses(hex) < 3
            && !tank.shooting.bonus_active()
        {
            value += self.config.catapult_position_bonus;
        }

        // the most dangerous team's term wins
        let mut threat_term: f64 = 1.0;
        for field in threats {
            let Some(&incoming) = field.get(&hex) else {
                continue;
            };
            let current = f64::from(tank.health.current);
            let hp_left = (current - f64::from(incoming)) / current;
            let term = if hp_left <= 0.0 && !repair_hex {
                // the tank would die here
                -f64::from(tank.destruction_reward.points)
            } else {
                1.0 - (1.0 - hp_left) * self.config.health_percent_loss_multiplier
            };
            threat_term = threat_term.min(term);
        }
        value * threat_term
    }

    /// Scores a completed plan: movers' destination values plus what the
    /// damage ledger buys once every shot resolves
    fn score_leaf(&self, world: &World, state: &mut SearchState) {
        let mut score: f64 = state
            .steps
            .iter()
            .map(|step| match step {
                Step::Move { value, .. } => *value,
                _ => 0.0,
            })
            .sum();

        let mut capture_denied = 0i32;
        let mut destruction = 0i32;
        let mut total_damage = 0i32;
        for (&id, &dealt) in &state.ledger {
            total_damage += dealt;
            if let Some(tank) = world.tanks().get(id) {
                if tank.health.current <= dealt {
                    capture_denied += tank.capture.points.max(0);
                    destruction += tank.destruction_reward.points;
                }
            }
        }
        score += 3.0f64.powi(capture_denied - 1)
            + 1.3 * f64::from(destruction)
            + 0.05 * f64::from(total_damage);

        if score > state.best_score {
            state.best_score = score;
            state.best_plan = state
                .steps
                .iter()
                .filter_map(|step| match *step {
                    Step::Move { tank, to, .. } => Some(PlannedAction::Move { tank, to }),
                    Step::Shoot { tank, target } => Some(PlannedAction::Shoot { tank, target }),
                    Step::Skip => None,
                })
                .collect();
        }
    }
}
