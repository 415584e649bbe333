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

//! Everything the simulation needs from the rest of the game. All of these
//! run on the same thread as the frame loop.

use crate::assets::{AssetError, Background};
use crate::player::Player;
use crate::util::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u32);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task {}", self.0)
    }
}

/// Gate on whether an obstacle or trigger is part of the room right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Condition {
    #[default]
    Always,
    WhileTaskPending(TaskId),
}

impl Condition {
    pub fn holds<Q: QuestLog + ?Sized>(&self, quests: &Q) -> bool {
        match self {
            Condition::Always => true,
            Condition::WhileTaskPending(task) => !quests.is_task_completed(*task),
        }
    }
}

/// Where the hero was when they left through an exit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub location: String,
    pub position: Vec2,
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("I/O error writing save: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode save: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("save rejected: {0}")]
    Rejected(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombatRequest {
    pub location: String,
    pub boss: Option<String>,
    pub task: Option<TaskId>,
    pub background: String,
    pub music: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

pub trait SaveGame {
    fn persist(&mut self, state: &SaveState) -> Result<(), SaveError>;
}

pub trait QuestLog {
    fn is_task_completed(&self, task: TaskId) -> bool;
}

/// Takes over completely until `poll_combat` returns an outcome. Marking the
/// boss task complete is the combat side's job. `player` is the hero as it
/// stood when the fight started.
pub trait CombatHandler {
    fn begin_combat(&mut self, request: CombatRequest, player: &Player);
    fn poll_combat(&mut self) -> Option<CombatOutcome>;
}

pub trait MusicPlayer {
    fn play_music(&mut self, path: &str) -> Result<(), AssetError>;
    fn stop_music(&mut self);
}

pub trait AssetLoader {
    fn load_background(&mut self, path: &str) -> Result<Background, AssetError>;
}

/// Shop counters, NPC conversations and the like.
pub trait InteractionHandler {
    fn interact(&mut self, location: &str, tag: &str);
}

pub trait Host:
    SaveGame + QuestLog + CombatHandler + MusicPlayer + AssetLoader + InteractionHandler
{
}

impl<T> Host for T where
    T: SaveGame + QuestLog + CombatHandler + MusicPlayer + AssetLoader + InteractionHandler
{
}
