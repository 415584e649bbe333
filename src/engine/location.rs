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

//! One screen of the game. Every location runs the same code; what differs
//! between the village and a castle floor lives in its `LocationDescriptor`.

use crate::assets::Background;
use crate::camera::{self, CameraState};
use crate::config::GameConfig;
use crate::host::Host;
use crate::input::{InputState, Key};
use crate::movement::{self, Direction, MovementBounds};
use crate::obstacle::{Obstacle, ObstacleSet};
use crate::trigger::{Activation, BossEncounter, TriggerAction, TriggerSet, TriggerZone};
use crate::ui::{self, Interpolator};
use crate::util::{Rect, Vec2};
use std::rc::Rc;
use tracing::{debug, info, warn};

pub const DEFAULT_ENTRANCE: &str = "default";

/// Static data for a location, as loaded from its map file.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationDescriptor {
    pub id: String,
    pub name: String,
    pub world: Vec2,
    pub background: String,
    pub music: String,
    pub entrances: Vec<(String, Vec2)>,
    pub obstacles: Vec<Obstacle>,
    pub triggers: Vec<TriggerZone>,
    // Action of the highlighted rectangle around the spawn point, if the
    // location has one.
    pub start_rect: Option<TriggerAction>,
}

impl LocationDescriptor {
    pub fn entrance(&self, name: &str) -> Option<Vec2> {
        self.entrances
            .iter()
            .find(|(entrance, _)| entrance == name)
            .map(|(_, position)| *position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationState {
    Loading,
    Active,
    // Another location was entered on top of this one.
    Suspended,
    InCombat,
    // Terminal. Coming back means building a new controller.
    Transitioning,
}

/// Request for the session, produced when a trigger fires.
#[derive(Clone, Debug, PartialEq)]
pub enum Handoff {
    Exit { to: Option<String> },
    Advance { to: String, entrance: Option<String> },
    Return,
    Boss(BossEncounter),
    Interact { tag: String },
}

pub struct LocationController {
    descriptor: Rc<LocationDescriptor>,
    config: GameConfig,
    state: LocationState,
    obstacles: ObstacleSet,
    triggers: TriggerSet,
    input: InputState,
    spawn: Vec2,
    position: Vec2,
    facing: Direction,
    camera: CameraState,
    hints: Vec<String>,
    // Contact zones the player was inside last frame. They fire on entry only.
    inside: Vec<String>,
    confirm_pending: bool,
    loading_elapsed: f32,
    fade: Interpolator,
    background: Background,
    attached: bool,
}

impl LocationController {
    /// Build the location, put the player at `entrance` and start the fade
    /// in. Control is handed to the player once the settle delay has passed.
    pub fn show_with_loading(
        descriptor: Rc<LocationDescriptor>,
        config: &GameConfig,
        entrance: Option<&str>,
        host: &mut dyn Host,
    ) -> LocationController {
        let wanted = entrance.unwrap_or(DEFAULT_ENTRANCE);
        let spawn = descriptor
            .entrance(wanted)
            .or_else(|| {
                warn!(
                    location = %descriptor.id,
                    entrance = wanted,
                    "unknown entrance, using default"
                );
                descriptor.entrance(DEFAULT_ENTRANCE)
            })
            .unwrap_or(Vec2::ZERO);

        let background = match host.load_background(&descriptor.background) {
            Ok(background) => background,
            Err(err) => {
                warn!(location = %descriptor.id, error = %err, "background unavailable");
                Background::placeholder_for(&descriptor.background)
            }
        };

        let mut fade = Interpolator::new(0.0, ui::cubic_inout);
        fade.start(config.settle_delay, 0.0, 1.0);

        let mut location = LocationController {
            descriptor,
            config: config.clone(),
            state: LocationState::Loading,
            obstacles: ObstacleSet::default(),
            triggers: TriggerSet::default(),
            input: InputState::new(),
            spawn,
            position: spawn,
            facing: Direction::None,
            camera: CameraState::default(),
            hints: Vec::new(),
            inside: Vec::new(),
            confirm_pending: false,
            loading_elapsed: 0.0,
            fade,
            background,
            attached: true,
        };

        location.populate(host);
        location.update_camera();
        location.rearm_contacts();
        location.start_music(host);

        info!(location = %location.descriptor.id, x = spawn.x, y = spawn.y, "location shown");
        location
    }

    // Rebuild obstacles and triggers from the descriptor under the current
    // quest flags.
    fn populate(&mut self, host: &mut dyn Host) {
        let obstacles: Vec<Obstacle> = self
            .descriptor
            .obstacles
            .iter()
            .filter(|o| o.condition.holds(&*host))
            .cloned()
            .collect();

        let mut triggers: Vec<TriggerZone> = self
            .descriptor
            .triggers
            .iter()
            .filter(|t| t.condition.holds(&*host))
            .cloned()
            .collect();

        if let Some(action) = &self.descriptor.start_rect {
            triggers.push(TriggerZone::around_spawn(
                self.spawn,
                self.config.player_size,
                self.config.start_rect_margin,
                action.clone(),
            ));
        }

        debug!(
            location = %self.descriptor.id,
            obstacles = obstacles.len(),
            triggers = triggers.len(),
            "populated"
        );
        self.obstacles.replace(obstacles);
        self.triggers.replace(triggers);
    }

    fn start_music(&mut self, host: &mut dyn Host) {
        if let Err(err) = host.play_music(&self.descriptor.music) {
            warn!(location = %self.descriptor.id, error = %err, "music unavailable");
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if key.is_confirm() {
            if self.state == LocationState::Active {
                self.confirm_pending = true;
            }
        } else if self.is_running() {
            self.input.press(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.release(key);
    }

    pub fn focus_lost(&mut self) {
        self.input.focus_lost();
    }

    /// Anything that opens a menu takes the held keys with it.
    pub fn consume_input(&mut self) {
        self.input.clear();
        self.confirm_pending = false;
    }

    /// Advance one frame.
    pub fn update(&mut self, d_t: f32, host: &mut dyn Host) -> Option<Handoff> {
        match self.state {
            LocationState::Loading => {
                self.loading_elapsed += d_t;
                self.fade.update(d_t);
                self.confirm_pending = false;
                if self.loading_elapsed >= self.config.settle_delay {
                    self.state = LocationState::Active;
                    debug!(location = %self.descriptor.id, "active");
                }

                None
            }
            LocationState::Active => self.run_frame(d_t, host),
            _ => None,
        }
    }

    fn run_frame(&mut self, d_t: f32, host: &mut dyn Host) -> Option<Handoff> {
        let velocity = movement::velocity(&self.input, self.config.player_speed);
        let outcome = movement::step(self.position, velocity, d_t, &self.bounds(), &self.obstacles);
        self.position = outcome.position;
        self.facing = Direction::from_velocity(velocity);
        self.update_camera();

        let player = self.player_box();
        self.hints = self
            .triggers
            .hints(&player)
            .into_iter()
            .map(String::from)
            .collect();

        let entered = self
            .triggers
            .iter()
            .filter(|z| z.activation == Activation::Contact && z.area.overlaps(&player))
            .find(|z| !self.inside.contains(&z.tag))
            .map(|z| (z.tag.clone(), z.action.clone()));
        self.rearm_contacts();
        if let Some((tag, action)) = entered {
            return self.fire(tag, action, host);
        }

        if std::mem::take(&mut self.confirm_pending) {
            let confirmed = self
                .triggers
                .first_with(&player, Activation::Confirm)
                .map(|z| (z.tag.clone(), z.action.clone()));
            if let Some((tag, action)) = confirmed {
                return self.fire(tag, action, host);
            }
        }

        None
    }

    fn rearm_contacts(&mut self) {
        let player = self.player_box();
        self.inside = self
            .triggers
            .iter()
            .filter(|z| z.activation == Activation::Contact && z.area.overlaps(&player))
            .map(|z| z.tag.clone())
            .collect();
    }

    fn fire(&mut self, tag: String, action: TriggerAction, host: &mut dyn Host) -> Option<Handoff> {
        debug!(location = %self.descriptor.id, tag = %tag, "trigger fired");
        match action {
            TriggerAction::None => None,
            TriggerAction::Interact => {
                self.consume_input();
                Some(Handoff::Interact { tag })
            }
            TriggerAction::Exit { to } => {
                self.teardown(host);
                Some(Handoff::Exit { to })
            }
            TriggerAction::Return => {
                self.teardown(host);
                Some(Handoff::Return)
            }
            TriggerAction::Advance { to, entrance } => {
                self.suspend(host);
                Some(Handoff::Advance { to, entrance })
            }
            TriggerAction::Boss(encounter) => {
                self.consume_input();
                self.state = LocationState::InCombat;
                host.stop_music();
                Some(Handoff::Boss(encounter))
            }
        }
    }

    /// Stop the loop and music and detach from the display. Safe to call
    /// more than once.
    pub fn teardown(&mut self, host: &mut dyn Host) {
        if self.state != LocationState::Transitioning {
            self.state = LocationState::Transitioning;
            self.consume_input();
            host.stop_music();
            info!(location = %self.descriptor.id, "location closed");
        }

        self.detach();
    }

    pub fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            debug!(location = %self.descriptor.id, "detached");
        }
    }

    fn suspend(&mut self, host: &mut dyn Host) {
        self.state = LocationState::Suspended;
        self.consume_input();
        host.stop_music();
    }

    /// Give control back after a location on top of this one closed or a
    /// fight ended.
    pub fn resume(&mut self, host: &mut dyn Host) {
        if matches!(self.state, LocationState::Suspended | LocationState::InCombat) {
            self.state = LocationState::Active;
            self.consume_input();
            self.rearm_contacts();
            self.start_music(host);
            debug!(location = %self.descriptor.id, "resumed");
        }
    }

    /// After a boss fight the boss and its triggers are gone if the quest
    /// flag says so. Running this again changes nothing.
    pub fn redraw_after_boss(&mut self, host: &mut dyn Host) {
        self.populate(host);
        self.rearm_contacts();
    }

    fn bounds(&self) -> MovementBounds {
        MovementBounds::new(self.descriptor.world, self.config.player_size)
    }

    fn update_camera(&mut self) {
        self.camera = camera::follow(
            self.player_box().center(),
            self.config.view,
            self.descriptor.world,
            &self.config.camera,
        );
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LocationState::Loading | LocationState::Active)
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn descriptor(&self) -> &LocationDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> LocationState {
        self.state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn player_box(&self) -> Rect<f32> {
        Rect::at(self.position, self.config.player_size)
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn is_hint_active(&self, tag: &str) -> bool {
        self.hints.iter().any(|h| h == tag)
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn triggers(&self) -> &TriggerSet {
        &self.triggers
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn fade_alpha(&self) -> f32 {
        self.fade.value()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeHost;
    use crate::host::{Condition, TaskId};
    use crate::obstacle::ObstacleKind;
    use crate::trigger::START_RECT_TAG;

    const FRAME: f32 = 0.1;

    fn descriptor() -> LocationDescriptor {
        let boss = BossEncounter {
            boss: "fire_golem".to_string(),
            task: Some(TaskId(7)),
            background: "combat/volcano.png".to_string(),
            music: "combat.mp3".to_string(),
        };

        LocationDescriptor {
            id: "hall".to_string(),
            name: "Hall".to_string(),
            world: Vec2::new(1000.0, 800.0),
            background: "hall.png".to_string(),
            music: "hall.mp3".to_string(),
            entrances: vec![
                (DEFAULT_ENTRANCE.to_string(), Vec2::new(54.0, 54.0)),
                ("stairs".to_string(), Vec2::new(600.0, 60.0)),
            ],
            obstacles: vec![
                Obstacle::new("pillar", ObstacleKind::Block, Rect::new(300.0, 0.0, 50.0, 400.0)),
                Obstacle::new("golem", ObstacleKind::Boss, Rect::new(700.0, 500.0, 60.0, 60.0))
                    .with_condition(Condition::WhileTaskPending(TaskId(7))),
            ],
            triggers: vec![
                TriggerZone::new(
                    "up_stairs",
                    Rect::new(600.0, 40.0, 64.0, 40.0),
                    TriggerAction::Advance {
                        to: "attic".to_string(),
                        entrance: None,
                    },
                ),
                TriggerZone::new(
                    "boss_trigger",
                    Rect::new(680.0, 480.0, 100.0, 100.0),
                    TriggerAction::Boss(boss),
                )
                .with_condition(Condition::WhileTaskPending(TaskId(7))),
                TriggerZone::new(
                    "counter",
                    Rect::new(100.0, 300.0, 100.0, 20.0),
                    TriggerAction::Interact,
                )
                .with_hint(true),
                TriggerZone::new("pit", Rect::new(900.0, 700.0, 40.0, 40.0), TriggerAction::Return)
                    .with_activation(Activation::Contact),
            ],
            start_rect: Some(TriggerAction::Exit { to: None }),
        }
    }

    fn shown(host: &mut FakeHost, entrance: Option<&str>) -> LocationController {
        let config = GameConfig::default();
        LocationController::show_with_loading(Rc::new(descriptor()), &config, entrance, host)
    }

    fn settle(location: &mut LocationController, host: &mut FakeHost) {
        for _ in 0..6 {
            assert_eq!(location.update(FRAME, host), None);
        }
        assert_eq!(location.state(), LocationState::Active);
    }

    #[test]
    fn test_show_positions_player() {
        let mut host = FakeHost::default();
        let location = shown(&mut host, None);
        assert_eq!(location.state(), LocationState::Loading);
        assert_eq!(location.position(), Vec2::new(54.0, 54.0));
        assert_eq!(host.music, vec!["hall.mp3"]);
        assert!(location.is_attached());
        assert_eq!(location.fade_alpha(), 0.0);

        let location = shown(&mut host, Some("stairs"));
        assert_eq!(location.position(), Vec2::new(600.0, 60.0));

        let location = shown(&mut host, Some("nowhere"));
        assert_eq!(location.position(), Vec2::new(54.0, 54.0));
    }

    #[test]
    fn test_missing_background_falls_back() {
        let mut host = FakeHost {
            missing_assets: true,
            ..FakeHost::default()
        };
        let location = shown(&mut host, None);
        assert!(location.background().is_placeholder());
        assert_eq!(location.obstacles().len(), 2);
    }

    #[test]
    fn test_no_movement_while_loading() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        location.key_down(Key::D);
        for _ in 0..5 {
            location.update(FRAME, &mut host);
            assert_eq!(location.position(), Vec2::new(54.0, 54.0));
        }

        location.update(FRAME, &mut host);
        assert_eq!(location.state(), LocationState::Active);
        assert!((location.fade_alpha() - 1.0).abs() < 1e-4);

        location.update(FRAME, &mut host);
        assert!((location.position().x - 72.0).abs() < 1e-3);
        assert_eq!(location.facing(), Direction::E);
    }

    #[test]
    fn test_confirm_while_loading_is_dropped() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        location.key_down(Key::Enter);
        settle(&mut location, &mut host);
        assert_eq!(location.update(FRAME, &mut host), None);
        assert!(host.saves.is_empty());
    }

    #[test]
    fn test_start_rect_exit() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        settle(&mut location, &mut host);

        let start = location.triggers().get(START_RECT_TAG).map(|z| z.area);
        assert_eq!(start, Some(Rect::new(50.0, 50.0, 56.0, 56.0)));

        location.update(FRAME, &mut host);
        assert!(location.is_hint_active(START_RECT_TAG));

        location.key_down(Key::Enter);
        assert_eq!(
            location.update(FRAME, &mut host),
            Some(Handoff::Exit { to: None })
        );
        assert_eq!(location.state(), LocationState::Transitioning);
        assert!(!location.is_attached());
        assert_eq!(host.music_stops, 1);

        // Nothing moves or fires after teardown.
        location.key_down(Key::S);
        location.key_down(Key::Enter);
        for _ in 0..10 {
            assert_eq!(location.update(FRAME, &mut host), None);
        }
        assert_eq!(location.position(), Vec2::new(54.0, 54.0));

        location.teardown(&mut host);
        assert_eq!(host.music_stops, 1);
    }

    #[test]
    fn test_confirm_is_edge_triggered() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, Some("stairs"));
        settle(&mut location, &mut host);

        // Standing in the stairs zone without pressing anything.
        for _ in 0..3 {
            assert_eq!(location.update(FRAME, &mut host), None);
        }

        location.key_down(Key::Space);
        assert_eq!(
            location.update(FRAME, &mut host),
            Some(Handoff::Advance {
                to: "attic".to_string(),
                entrance: None
            })
        );
        assert_eq!(location.state(), LocationState::Suspended);
        assert_eq!(location.update(FRAME, &mut host), None);

        location.resume(&mut host);
        assert_eq!(location.state(), LocationState::Active);
        assert_eq!(location.update(FRAME, &mut host), None);
        assert_eq!(host.music.len(), 2);
    }

    #[test]
    fn test_interact_consumes_input() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        settle(&mut location, &mut host);

        // Walk down onto the counter.
        location.key_down(Key::Down);
        while !location.is_hint_active("counter") {
            assert_eq!(location.update(FRAME, &mut host), None);
            assert!(location.position().y < 400.0);
        }

        location.key_down(Key::Enter);
        assert_eq!(
            location.update(FRAME, &mut host),
            Some(Handoff::Interact {
                tag: "counter".to_string()
            })
        );
        assert_eq!(location.state(), LocationState::Active);

        // The held key went with the menu.
        let before = location.position();
        location.update(FRAME, &mut host);
        assert_eq!(location.position(), before);
    }

    #[test]
    fn test_contact_fires_on_entry_only() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        settle(&mut location, &mut host);
        location.position = Vec2::new(850.0, 680.0);

        location.key_down(Key::Right);
        let mut fired = Vec::new();
        for _ in 0..5 {
            if let Some(handoff) = location.update(FRAME, &mut host) {
                fired.push(handoff);
            }
        }
        assert_eq!(fired, vec![Handoff::Return]);
        assert_eq!(location.state(), LocationState::Transitioning);
    }

    #[test]
    fn test_boss_and_redraw() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        settle(&mut location, &mut host);
        assert!(location.obstacles().get("golem").is_some());
        assert!(location.triggers().get("boss_trigger").is_some());

        location.position = Vec2::new(690.0, 450.0);
        location.key_down(Key::Enter);
        match location.update(FRAME, &mut host) {
            Some(Handoff::Boss(encounter)) => assert_eq!(encounter.boss, "fire_golem"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(location.state(), LocationState::InCombat);

        host.completed.insert(TaskId(7));
        location.redraw_after_boss(&mut host);
        location.redraw_after_boss(&mut host);
        location.resume(&mut host);
        assert!(location.obstacles().get("golem").is_none());
        assert!(location.triggers().get("boss_trigger").is_none());
        assert_eq!(location.obstacles().len(), 1);
        assert!(location.triggers().get(START_RECT_TAG).is_some());
        assert_eq!(location.state(), LocationState::Active);
    }

    #[test]
    fn test_focus_loss_stops_movement() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        settle(&mut location, &mut host);

        location.key_down(Key::Right);
        location.update(FRAME, &mut host);
        let moved = location.position();
        assert!(moved.x > 54.0);

        location.focus_lost();
        location.update(FRAME, &mut host);
        assert_eq!(location.position(), moved);
        assert_eq!(location.facing(), Direction::None);
    }

    #[test]
    fn test_pillar_blocks() {
        let mut host = FakeHost::default();
        let mut location = shown(&mut host, None);
        settle(&mut location, &mut host);

        location.key_down(Key::D);
        for _ in 0..40 {
            location.update(FRAME, &mut host);
        }
        assert_eq!(location.position().x, 300.0 - 48.0);
        assert!(!location.obstacles().blocks(&location.player_box()));
    }
}
