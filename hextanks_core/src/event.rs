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

//! Typed publish/subscribe bus connecting the simulator systems
//!
//! Each event kind carries a handler list in registration order. Emitted
//! events enter a FIFO queue which the world drains after every operation,
//! so a handler that emits (shot -> destroyed -> queued respawn) has its
//! follow-up events land behind the one being processed. No system
//! observes a partially-applied mutation.

use std::collections::{HashMap, VecDeque};

use crate::TankId;
use crate::hex::CubePosition;

/// Everything the simulator systems react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    TankAdded(TankId),
    TankMoved { id: TankId, to: CubePosition },
    TankShot { id: TankId, damage: i32 },
    TankDestroyed(TankId),
    TankRespawned(TankId),
    TankRepaired(TankId),
    TankRangeBonus(TankId),
}

/// Discriminant used for subscription lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TankAdded,
    TankMoved,
    TankShot,
    TankDestroyed,
    TankRespawned,
    TankRepaired,
    TankRangeBonus,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::TankAdded(_) => EventKind::TankAdded,
            Self::TankMoved { .. } => EventKind::TankMoved,
            Self::TankShot { .. } => EventKind::TankShot,
            Self::TankDestroyed(_) => EventKind::TankDestroyed,
            Self::TankRespawned(_) => EventKind::TankRespawned,
            Self::TankRepaired(_) => EventKind::TankRepaired,
            Self::TankRangeBonus(_) => EventKind::TankRangeBonus,
        }
    }
}

/// The systems that can subscribe to events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemId {
    Movement,
    Shooting,
    Health,
    Respawn,
}

#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<SystemId>>,
    queue: VecDeque<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, system: SystemId) {
        self.handlers.entry(kind).or_default().push(system);
    }

    pub fn emit(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Subscribers for an event kind, in registration order
    pub fn handlers_for(&self, kind: EventKind) -> &[SystemId] {
        match self.handlers.get(&kind) {
            Some(handlers) => handlers,
            None => &[],
        }
    }

    /// Drops any queued events; used when rebuilding from a snapshot
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handlers_keep_registration_order() {
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::TankAdded, SystemId::Movement);
        bus.subscribe(EventKind::TankAdded, SystemId::Shooting);
        assert_eq!(
            bus.handlers_for(EventKind::TankAdded),
            &[SystemId::Movement, SystemId::Shooting]
        );
        assert!(bus.handlers_for(EventKind::TankShot).is_empty());
    }

    #[test]
    fn queue_is_fifo() {
        let mut bus = EventBus::new();
        let id = TankId::from(1);
        bus.emit(Event::TankShot { id, damage: 1 });
        bus.emit(Event::TankDestroyed(id));
        assert_eq!(bus.pop(), Some(Event::TankShot { id, damage: 1 }));
        assert_eq!(bus.pop(), Some(Event::TankDestroyed(id)));
        assert_eq!(bus.pop(), None);
    }
}
