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

use crate::util::Vec2;

// The bottom quarter of the world.
const LOWER_ZONE_START: f32 = 0.75;

pub const LOWER_ZONE_DAMPING: f32 = 0.45;

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    // Fraction of the normal follow applied once the player is in the lower
    // zone. None disables the damping.
    pub lower_zone_damping: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> CameraConfig {
        CameraConfig {
            lower_zone_damping: Some(LOWER_ZONE_DAMPING),
        }
    }
}

/// Offset added to world coordinates to get view coordinates. Always <= 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraState {
    pub translate_x: f32,
    pub translate_y: f32,
}

impl CameraState {
    /// Top left corner of the visible part of the world.
    pub fn scroll(&self) -> (i32, i32) {
        (-self.translate_x as i32, -self.translate_y as i32)
    }
}

// Center `center` in the view, but never show anything outside the world.
fn follow_axis(center: f32, view: f32, world: f32) -> f32 {
    let min = (view - world).min(0.0);
    (view / 2.0 - center).clamp(min, 0.0)
}

pub fn follow(center: Vec2, view: Vec2, world: Vec2, config: &CameraConfig) -> CameraState {
    let translate_x = follow_axis(center.x, view.x, world.x);
    let mut translate_y = follow_axis(center.y, view.y, world.y);

    if let Some(factor) = config.lower_zone_damping {
        let zone_top = world.y * LOWER_ZONE_START;
        if center.y > zone_top {
            let entry = follow_axis(zone_top, view.y, world.y);
            translate_y = entry + (translate_y - entry) * factor;
        }
    }

    CameraState {
        translate_x,
        translate_y,
    }
}
