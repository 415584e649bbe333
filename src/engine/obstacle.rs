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

use crate::host::Condition;
use crate::util::Rect;

/// RGBA, 0.0 - 1.0
pub type Color = (f32, f32, f32, f32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Block,
    Wall,
    Plant,
    Door,
    Npc,
    Furniture,
    Decoration,
    Boss,
}

impl ObstacleKind {
    pub fn from_name(name: &str) -> Option<ObstacleKind> {
        match name {
            "block" => Some(ObstacleKind::Block),
            "wall" => Some(ObstacleKind::Wall),
            "plant" => Some(ObstacleKind::Plant),
            "door" => Some(ObstacleKind::Door),
            "npc" => Some(ObstacleKind::Npc),
            "furniture" => Some(ObstacleKind::Furniture),
            "decoration" => Some(ObstacleKind::Decoration),
            "boss" => Some(ObstacleKind::Boss),
            _ => None,
        }
    }

    /// Doors only gate triggers. Everything else stops the player unless the
    /// map says otherwise.
    pub fn blocks_by_default(self) -> bool {
        !matches!(self, ObstacleKind::Door)
    }

    pub fn debug_color(self) -> Color {
        match self {
            ObstacleKind::Block => (0.55, 0.35, 0.2, 0.6),
            ObstacleKind::Wall => (0.4, 0.4, 0.45, 0.6),
            ObstacleKind::Plant => (0.2, 0.7, 0.25, 0.6),
            ObstacleKind::Door => (0.95, 0.8, 0.2, 0.6),
            ObstacleKind::Npc => (0.3, 0.5, 0.95, 0.6),
            ObstacleKind::Furniture => (0.7, 0.5, 0.3, 0.6),
            ObstacleKind::Decoration => (0.8, 0.8, 0.8, 0.4),
            ObstacleKind::Boss => (0.9, 0.15, 0.15, 0.7),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect<f32>,
    pub kind: ObstacleKind,
    pub id: String,
    pub blocks_movement: bool,
    pub condition: Condition,
}

impl Obstacle {
    pub fn new(id: &str, kind: ObstacleKind, rect: Rect<f32>) -> Obstacle {
        Obstacle {
            rect,
            kind,
            id: id.to_string(),
            blocks_movement: kind.blocks_by_default(),
            condition: Condition::Always,
        }
    }

    pub fn with_blocking(mut self, blocks_movement: bool) -> Obstacle {
        self.blocks_movement = blocks_movement;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Obstacle {
        self.condition = condition;
        self
    }
}

/// Static collision geometry for one location. Never edited in place: when
/// the room changes (a boss is beaten) the whole list is replaced.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> ObstacleSet {
        ObstacleSet { obstacles }
    }

    pub fn replace(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn blocking_overlaps<'a>(
        &'a self,
        rect: &Rect<f32>,
    ) -> impl Iterator<Item = &'a Obstacle> + 'a {
        let rect = *rect;
        self.obstacles
            .iter()
            .filter(move |o| o.blocks_movement && o.rect.overlaps(&rect))
    }

    /// True if `rect` collides with anything that stops movement.
    pub fn blocks(&self, rect: &Rect<f32>) -> bool {
        self.blocking_overlaps(rect).next().is_some()
    }
}
