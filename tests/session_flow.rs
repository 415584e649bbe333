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

use engine::assets::{AssetError, Background};
use engine::config::GameConfig;
use engine::host::{
    AssetLoader, CombatHandler, CombatOutcome, CombatRequest, InteractionHandler, MusicPlayer,
    QuestLog, SaveError, SaveGame, SaveState, TaskId,
};
use engine::input::Key;
use engine::location::LocationState;
use engine::mapfile;
use engine::player::{HeroSprites, Player};
use engine::registry::LocationRegistry;
use engine::session::Session;
use engine::util::Vec2;
use std::path::Path;
use std::time::Duration;

const CAVE_MOUTH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map width="20" height="15" tilewidth="32" tileheight="32">
 <properties>
  <property name="id" value="cave_mouth"/>
  <property name="music" value="music/wind.mp3"/>
  <property name="background" value="backgrounds/cave_mouth.png"/>
  <property name="start_rect" value="exit"/>
 </properties>
 <objectgroup name="obstacles">
  <object id="1" name="rockface" type="block" x="440" y="150" width="40" height="150"/>
  <object id="2" name="boulder" type="block" x="0" y="150" width="52" height="150"/>
 </objectgroup>
 <objectgroup name="triggers">
  <object id="3" name="tunnel" type="advance" x="400" y="200" width="40" height="48">
   <properties><property name="to" value="cave"/></properties>
  </object>
 </objectgroup>
 <objectgroup name="entrances">
  <object id="4" name="default" x="100" y="200"><point/></object>
 </objectgroup>
</map>
"#;

const CAVE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map width="20" height="15" tilewidth="32" tileheight="32">
 <properties>
  <property name="id" value="cave"/>
  <property name="music" value="music/drips.mp3"/>
  <property name="start_rect" value="return"/>
 </properties>
 <objectgroup name="triggers">
  <object id="1" name="lava" type="return" x="300" y="40" width="60" height="100">
   <properties><property name="activation" value="contact"/></properties>
  </object>
 </objectgroup>
 <objectgroup name="entrances">
  <object id="2" name="default" x="64" y="64"><point/></object>
 </objectgroup>
</map>
"#;

#[derive(Default)]
struct RecordingHost {
    saves: Vec<SaveState>,
    music: Vec<String>,
    backgrounds: Vec<String>,
}

impl SaveGame for RecordingHost {
    fn persist(&mut self, state: &SaveState) -> Result<(), SaveError> {
        self.saves.push(state.clone());
        Ok(())
    }
}

impl QuestLog for RecordingHost {
    fn is_task_completed(&self, _task: TaskId) -> bool {
        false
    }
}

impl CombatHandler for RecordingHost {
    fn begin_combat(&mut self, _request: CombatRequest, _player: &Player) {}

    fn poll_combat(&mut self) -> Option<CombatOutcome> {
        None
    }
}

impl MusicPlayer for RecordingHost {
    fn play_music(&mut self, path: &str) -> Result<(), AssetError> {
        self.music.push(path.to_string());
        Ok(())
    }

    fn stop_music(&mut self) {}
}

impl AssetLoader for RecordingHost {
    fn load_background(&mut self, path: &str) -> Result<Background, AssetError> {
        self.backgrounds.push(path.to_string());
        Err(AssetError::Missing(path.to_string()))
    }
}

impl InteractionHandler for RecordingHost {
    fn interact(&mut self, _location: &str, _tag: &str) {}
}

fn load(dir: &Path) -> LocationRegistry {
    let mut registry = LocationRegistry::new();
    for (name, text) in [("cave_mouth.tmx", CAVE_MOUTH), ("cave.tmx", CAVE)] {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        registry.insert(mapfile::load_map(&path).unwrap()).unwrap();
    }

    registry.validate_links().unwrap();
    registry
}

struct Clock(Duration);

impl Clock {
    fn next(&mut self) -> Duration {
        self.0 += Duration::from_millis(100);
        self.0
    }
}

fn run_until<F>(
    session: &mut Session<RecordingHost>,
    clock: &mut Clock,
    limit: usize,
    mut done: F,
) -> usize
where
    F: FnMut(&Session<RecordingHost>) -> bool,
{
    for frame in 0..limit {
        if done(session) {
            return frame;
        }
        session.tick(clock.next());
    }

    panic!("condition not reached in {} frames", limit);
}

fn is_active(session: &Session<RecordingHost>) -> bool {
    session.current_state() == Some(LocationState::Active)
}

#[test]
fn test_cave_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let player = Player::new(HeroSprites::with_base("hero"), 0);
    let host = RecordingHost::default();
    let mut session = Session::new(load(dir.path()), GameConfig::default(), host, player);
    let mut clock = Clock(Duration::from_secs(3));

    session.start("cave_mouth", None).unwrap();
    assert!(session.current().unwrap().background().is_placeholder());
    run_until(&mut session, &mut clock, 20, is_active);

    // Walk right until the rock face stops us in the tunnel mouth.
    session.key_down(Key::Right);
    run_until(&mut session, &mut clock, 40, |s| s.player().position.x == 392.0);
    session.key_up(Key::Right);
    assert_eq!(session.player().position, Vec2::new(392.0, 200.0));

    session.key_down(Key::Enter);
    session.tick(clock.next());
    session.key_up(Key::Enter);
    run_until(&mut session, &mut clock, 5, |s| s.current().map(|c| c.id()) == Some("cave"));
    assert_eq!(session.suspended_depth(), 1);
    run_until(&mut session, &mut clock, 20, is_active);

    // Stepping into the lava throws the hero back out without a confirm.
    session.key_down(Key::D);
    run_until(&mut session, &mut clock, 40, |s| s.current().map(|c| c.id()) == Some("cave_mouth"));
    session.key_up(Key::D);
    assert_eq!(session.suspended_depth(), 0);
    assert!(is_active(&session));
    assert_eq!(session.player().position, Vec2::new(392.0, 200.0));
    assert!(session.host().saves.is_empty());

    // Back to the start rectangle and out.
    session.key_down(Key::Left);
    run_until(&mut session, &mut clock, 40, |s| s.player().position.x == 52.0);
    session.key_up(Key::Left);
    let current = session.current().unwrap();
    assert!(current.is_hint_active(engine::trigger::START_RECT_TAG));

    session.key_down(Key::Enter);
    session.tick(clock.next());
    session.tick(clock.next());
    assert!(session.is_finished());
    assert_eq!(
        session.host().saves,
        vec![SaveState {
            location: "cave_mouth".to_string(),
            position: Vec2::new(52.0, 200.0)
        }]
    );
    assert_eq!(
        session.host().music,
        vec!["music/wind.mp3", "music/drips.mp3", "music/wind.mp3"]
    );
    assert_eq!(
        session.host().backgrounds,
        vec!["backgrounds/cave_mouth.png", ""]
    );
}

#[test]
fn test_focus_loss_stops_walking() {
    let dir = tempfile::tempdir().unwrap();
    let player = Player::new(HeroSprites::with_base("hero"), 0);
    let host = RecordingHost::default();
    let mut session = Session::new(load(dir.path()), GameConfig::default(), host, player);
    let mut clock = Clock(Duration::ZERO);

    session.start("cave_mouth", None).unwrap();
    run_until(&mut session, &mut clock, 20, is_active);

    session.key_down(Key::Down);
    session.tick(clock.next());
    let y = session.player().position.y;
    assert!(y > 200.0);

    session.focus_lost();
    for _ in 0..5 {
        session.tick(clock.next());
    }
    assert_eq!(session.player().position.y, y);
}
