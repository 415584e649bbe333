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

//! The game's side of the host traits: quest flags, the save file, music
//! and backgrounds, and a stand-in for the combat screen.

use engine::assets::{self, AssetError, Background};
use engine::host::{
    AssetLoader, CombatHandler, CombatOutcome, CombatRequest, InteractionHandler, MusicPlayer,
    QuestLog, SaveError, SaveGame, SaveState, TaskId,
};
use engine::player::Player;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// Frames the stand-in combat takes before the hero wins.
const COMBAT_FRAMES: u32 = 60;

/// Writes the save state as JSON, replacing whatever was there.
pub struct JsonSaveFile {
    path: PathBuf,
}

impl JsonSaveFile {
    pub fn new(path: &Path) -> JsonSaveFile {
        JsonSaveFile {
            path: path.to_path_buf(),
        }
    }

    pub fn write(&self, state: &SaveState) -> Result<(), SaveError> {
        let encoded = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, encoded)?;
        Ok(())
    }
}

/// Keeps track of what would be playing when there is no audio device.
#[derive(Default)]
pub struct SilentMusic {
    current: Option<String>,
}

impl MusicPlayer for SilentMusic {
    fn play_music(&mut self, path: &str) -> Result<(), AssetError> {
        debug!(path = path, "music (silent)");
        self.current = Some(path.to_string());
        Ok(())
    }

    fn stop_music(&mut self) {
        self.current = None;
    }
}

struct Fight {
    request: CombatRequest,
    frames_left: u32,
}

pub struct GameHost {
    completed: BTreeSet<TaskId>,
    save_file: JsonSaveFile,
    music: Box<dyn MusicPlayer>,
    asset_root: PathBuf,
    fight: Option<Fight>,
    interactions: usize,
}

impl GameHost {
    pub fn new(save_path: &Path, asset_root: &Path, music: Box<dyn MusicPlayer>) -> GameHost {
        GameHost {
            completed: BTreeSet::new(),
            save_file: JsonSaveFile::new(save_path),
            music,
            asset_root: asset_root.to_path_buf(),
            fight: None,
            interactions: 0,
        }
    }

    pub fn complete_task(&mut self, task: TaskId) {
        if self.completed.insert(task) {
            info!(task = %task, "task completed");
        }
    }

    pub fn interactions(&self) -> usize {
        self.interactions
    }
}

impl SaveGame for GameHost {
    fn persist(&mut self, state: &SaveState) -> Result<(), SaveError> {
        self.save_file.write(state)
    }
}

impl QuestLog for GameHost {
    fn is_task_completed(&self, task: TaskId) -> bool {
        self.completed.contains(&task)
    }
}

impl CombatHandler for GameHost {
    fn begin_combat(&mut self, request: CombatRequest, player: &Player) {
        info!(
            boss = ?request.boss,
            background = %request.background,
            hero = player.current_sprite(),
            money = player.money,
            "entering combat"
        );
        self.fight = Some(Fight {
            request,
            frames_left: COMBAT_FRAMES,
        });
    }

    fn poll_combat(&mut self) -> Option<CombatOutcome> {
        let fight = self.fight.as_mut()?;
        if fight.frames_left > 0 {
            fight.frames_left -= 1;
            return None;
        }

        let task = fight.request.task;
        self.fight = None;
        if let Some(task) = task {
            self.complete_task(task);
        }

        Some(CombatOutcome::Victory)
    }
}

impl MusicPlayer for GameHost {
    fn play_music(&mut self, path: &str) -> Result<(), AssetError> {
        self.music.play_music(path)
    }

    fn stop_music(&mut self) {
        self.music.stop_music();
    }
}

impl AssetLoader for GameHost {
    fn load_background(&mut self, path: &str) -> Result<Background, AssetError> {
        assets::load_background(&self.asset_root.join(path))
    }
}

impl InteractionHandler for GameHost {
    fn interact(&mut self, location: &str, tag: &str) {
        self.interactions += 1;
        info!(location = location, tag = tag, "interaction");
    }
}
