//
// Copyright 2025 Jeff Bush
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Owns the hero and whichever location is on screen, and carries out the
//! handoffs locations produce. A handoff raised during a frame is applied at
//! the start of the next tick, so the frame that raised it and any teardown
//! finish before the next location is set up.

use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::host::{CombatOutcome, CombatRequest, Host, SaveState};
use crate::input::Key;
use crate::location::{Handoff, LocationController, LocationState};
use crate::player::Player;
use crate::registry::LocationRegistry;
use crate::trigger::BossEncounter;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("unknown location {0:?}")]
    UnknownLocation(String),
}

pub struct Session<H: Host> {
    registry: LocationRegistry,
    config: GameConfig,
    host: H,
    player: Player,
    clock: FrameClock,
    current: Option<LocationController>,
    // Locations that advanced into the current one, innermost last.
    suspended: Vec<LocationController>,
    pending: VecDeque<Handoff>,
    in_combat: bool,
    finished: bool,
}

impl<H: Host> Session<H> {
    pub fn new(
        registry: LocationRegistry,
        config: GameConfig,
        host: H,
        player: Player,
    ) -> Session<H> {
        Session {
            registry,
            config,
            host,
            player,
            clock: FrameClock::new(),
            current: None,
            suspended: Vec::new(),
            pending: VecDeque::new(),
            in_combat: false,
            finished: false,
        }
    }

    pub fn start(&mut self, location: &str, entrance: Option<&str>) -> Result<(), SessionError> {
        if !self.registry.contains(location) {
            return Err(SessionError::UnknownLocation(location.to_string()));
        }

        self.quit();
        self.finished = false;
        self.clock.reset();
        let controller = self.build(location, entrance)?;
        self.show(controller);
        Ok(())
    }

    fn build(
        &mut self,
        location: &str,
        entrance: Option<&str>,
    ) -> Result<LocationController, SessionError> {
        let descriptor = self
            .registry
            .get(location)
            .ok_or_else(|| SessionError::UnknownLocation(location.to_string()))?;

        Ok(LocationController::show_with_loading(
            descriptor,
            &self.config,
            entrance,
            &mut self.host,
        ))
    }

    fn show(&mut self, controller: LocationController) {
        self.player.position = controller.position();
        self.player.facing = controller.facing();
        self.current = Some(controller);
    }

    /// One frame. `now` is a monotonic timestamp.
    pub fn tick(&mut self, now: Duration) {
        let d_t = self.clock.tick(now);
        while let Some(handoff) = self.pending.pop_front() {
            self.apply(handoff);
        }

        if self.finished {
            return;
        }

        if self.in_combat {
            match self.host.poll_combat() {
                Some(outcome) => self.end_combat(outcome),
                None => return,
            }
        }

        let Some(current) = self.current.as_mut() else {
            return;
        };

        if let Some(handoff) = current.update(d_t, &mut self.host) {
            debug!(location = current.id(), handoff = ?handoff, "handoff queued");
            self.pending.push_back(handoff);
        }

        self.player.position = current.position();
        self.player.facing = current.facing();
    }

    fn apply(&mut self, handoff: Handoff) {
        match handoff {
            Handoff::Exit { to } => self.exit(to),
            Handoff::Advance { to, entrance } => self.advance(&to, entrance.as_deref()),
            Handoff::Return => self.return_to_previous(),
            Handoff::Boss(encounter) => self.begin_combat(encounter),
            Handoff::Interact { tag } => {
                if let Some(current) = &self.current {
                    self.host.interact(current.id(), &tag);
                }
            }
        }
    }

    fn exit(&mut self, to: Option<String>) {
        if let Some(mut current) = self.current.take() {
            let state = SaveState {
                location: current.id().to_string(),
                position: current.position(),
            };
            self.player.record_exit(&state.location, state.position);
            if let Err(err) = self.host.persist(&state) {
                warn!(location = %state.location, error = %err, "could not save game");
            } else {
                info!(location = %state.location, "game saved");
            }

            current.teardown(&mut self.host);
        }

        for mut location in self.suspended.drain(..).rev() {
            location.teardown(&mut self.host);
        }

        match to {
            Some(to) => match self.build(&to, None) {
                Ok(controller) => self.show(controller),
                Err(err) => {
                    error!(error = %err, "exit leads nowhere");
                    self.finished = true;
                }
            },
            None => {
                info!("session finished");
                self.finished = true;
            }
        }
    }

    fn advance(&mut self, to: &str, entrance: Option<&str>) {
        match self.build(to, entrance) {
            Ok(controller) => {
                if let Some(current) = self.current.take() {
                    self.suspended.push(current);
                }
                self.show(controller);
            }
            Err(err) => {
                warn!(error = %err, "advance ignored");
                if let Some(current) = self.current.as_mut() {
                    current.resume(&mut self.host);
                }
            }
        }
    }

    // With nothing to go back to this leaves the chain like an exit.
    fn return_to_previous(&mut self) {
        let Some(mut previous) = self.suspended.pop() else {
            debug!("nothing to return to");
            self.exit(None);
            return;
        };

        if let Some(mut current) = self.current.take() {
            current.teardown(&mut self.host);
        }

        previous.resume(&mut self.host);
        self.show(previous);
    }

    fn begin_combat(&mut self, encounter: BossEncounter) {
        let Some(current) = &self.current else {
            return;
        };

        info!(location = current.id(), boss = %encounter.boss, "combat started");
        self.player.position = current.position();
        self.player.facing = current.facing();
        let request = CombatRequest {
            location: current.id().to_string(),
            boss: Some(encounter.boss),
            task: encounter.task,
            background: encounter.background,
            music: encounter.music,
        };
        self.host.begin_combat(request, &self.player);
        self.in_combat = true;
    }

    fn end_combat(&mut self, outcome: CombatOutcome) {
        self.in_combat = false;
        if let Some(current) = self.current.as_mut() {
            info!(location = current.id(), outcome = ?outcome, "combat finished");
            current.redraw_after_boss(&mut self.host);
            current.resume(&mut self.host);
        }
    }

    /// Tear everything down without saving, e.g. when the window closes.
    pub fn quit(&mut self) {
        if let Some(mut current) = self.current.take() {
            current.teardown(&mut self.host);
        }

        for mut location in self.suspended.drain(..).rev() {
            location.teardown(&mut self.host);
        }

        self.pending.clear();
        self.in_combat = false;
        self.finished = true;
    }

    pub fn key_down(&mut self, key: Key) {
        if !self.in_combat {
            if let Some(current) = self.current.as_mut() {
                current.key_down(key);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if let Some(current) = self.current.as_mut() {
            current.key_up(key);
        }
    }

    pub fn focus_lost(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.focus_lost();
        }
    }

    pub fn current(&self) -> Option<&LocationController> {
        self.current.as_ref()
    }

    pub fn current_state(&self) -> Option<LocationState> {
        self.current.as_ref().map(|c| c.state())
    }

    pub fn suspended_depth(&self) -> usize {
        self.suspended.len()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_in_combat(&self) -> bool {
        self.in_combat
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
