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

use crate::movement::Direction;
use crate::util::Vec2;

/// Sprite paths for the hero, one per facing.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroSprites {
    pub idle: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl HeroSprites {
    /// Looks for `<base>_<facing>.png` next to each other.
    pub fn with_base(base: &str) -> HeroSprites {
        HeroSprites {
            idle: format!("{}.png", base),
            up: format!("{}_up.png", base),
            down: format!("{}_down.png", base),
            left: format!("{}_left.png", base),
            right: format!("{}_right.png", base),
        }
    }

    // Diagonals use the horizontal sprite.
    pub fn sprite_for(&self, facing: Direction) -> &str {
        match facing {
            Direction::None => &self.idle,
            Direction::N => &self.up,
            Direction::S => &self.down,
            Direction::W | Direction::NW | Direction::SW => &self.left,
            Direction::E | Direction::NE | Direction::SE => &self.right,
        }
    }
}

/// The one hero. Locations only move it around; the session copies the
/// position back from whichever location is current.
#[derive(Clone, Debug)]
pub struct Player {
    pub sprites: HeroSprites,
    pub position: Vec2,
    pub facing: Direction,
    pub money: u32,
    last_location: Option<String>,
    last_position: Option<Vec2>,
}

impl Player {
    pub fn new(sprites: HeroSprites, money: u32) -> Player {
        Player {
            sprites,
            position: Vec2::ZERO,
            facing: Direction::None,
            money,
            last_location: None,
            last_position: None,
        }
    }

    pub fn current_sprite(&self) -> &str {
        self.sprites.sprite_for(self.facing)
    }

    /// Recorded when the hero leaves through an exit.
    pub fn record_exit(&mut self, location: &str, position: Vec2) {
        self.last_location = Some(location.to_string());
        self.last_position = Some(position);
    }

    pub fn last_location(&self) -> Option<&str> {
        self.last_location.as_deref()
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }
}
