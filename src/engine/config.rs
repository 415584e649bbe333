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

use crate::camera::CameraConfig;
use crate::util::Vec2;

pub const WINDOW_WIDTH: i32 = 800;
pub const WINDOW_HEIGHT: i32 = 450;

pub const PLAYER_WIDTH: f32 = 48.0;
pub const PLAYER_HEIGHT: f32 = 48.0;

// Pixels per second along each axis.
pub const PLAYER_SPEED: f32 = 180.0;

// Time between a location being shown and the player gaining control. Only
// used for the fade in.
pub const SETTLE_DELAY: f32 = 0.6;

// Padding around the spawn box that forms the "back to the map" rectangle.
pub const START_RECT_MARGIN: f32 = 4.0;

/// Tuning shared by every location.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub view: Vec2,
    pub player_size: Vec2,
    pub player_speed: f32,
    pub settle_delay: f32,
    pub start_rect_margin: f32,
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            view: Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32),
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            player_speed: PLAYER_SPEED,
            settle_delay: SETTLE_DELAY,
            start_rect_margin: START_RECT_MARGIN,
            camera: CameraConfig::default(),
        }
    }
}
