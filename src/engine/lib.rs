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

//! Movement, collision, camera and trigger core shared by every location in
//! the game, plus the session that moves the hero between locations.

pub mod assets;
pub mod camera;
pub mod clock;
pub mod config;
pub mod host;
pub mod input;
pub mod location;
pub mod mapfile;
pub mod movement;
pub mod obstacle;
pub mod player;
pub mod registry;
pub mod session;
pub mod trigger;
pub mod ui;
pub mod util;

#[cfg(feature = "sdl")]
mod app;
#[cfg(feature = "sdl")]
pub mod audio;
#[cfg(feature = "sdl")]
pub mod gfx;

#[cfg(feature = "sdl")]
pub use app::GameEngine;
