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

use crate::gfx;
use crate::host::Host;
use crate::input::Key;
use crate::session::Session;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use std::time::Instant;
use tracing::info;

const PLAYER_COLOR: (f32, f32, f32, f32) = (0.95, 0.95, 1.0, 0.9);
const TRIGGER_COLOR: (f32, f32, f32, f32) = (0.2, 0.9, 0.9, 0.2);
const HINT_COLOR: (f32, f32, f32, f32) = (1.0, 1.0, 0.3, 0.5);

pub struct GameEngine {
    _sdl: sdl2::Sdl,
    context: gfx::RenderContext,
    event_pump: sdl2::EventPump,
    shown_location: Option<String>,
}

fn map_key(key: Keycode) -> Key {
    match key {
        Keycode::W => Key::W,
        Keycode::A => Key::A,
        Keycode::S => Key::S,
        Keycode::D => Key::D,
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Return | Keycode::KpEnter => Key::Enter,
        Keycode::Space => Key::Space,
        _ => Key::Other,
    }
}

impl GameEngine {
    pub fn new(view_width: u32, view_height: u32) -> Result<GameEngine, String> {
        let sdl = sdl2::init()?;
        Ok(GameEngine {
            context: gfx::RenderContext::new(&sdl, view_width, view_height)?,
            event_pump: sdl.event_pump()?,
            shown_location: None,
            _sdl: sdl,
        })
    }

    /// Run frames until the window closes or the session ends.
    pub fn run<H: Host>(&mut self, session: &mut Session<H>) {
        let clock = Instant::now();
        'main: loop {
            for event in self.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => {
                        session.quit();
                        break 'main;
                    }
                    Event::KeyDown {
                        keycode: Some(keycode),
                        repeat: false,
                        ..
                    } => session.key_down(map_key(keycode)),
                    Event::KeyUp {
                        keycode: Some(keycode),
                        ..
                    } => session.key_up(map_key(keycode)),
                    Event::Window {
                        win_event: WindowEvent::FocusLost,
                        ..
                    } => session.focus_lost(),
                    _ => {}
                }
            }

            session.tick(clock.elapsed());
            if session.is_finished() {
                info!("session over, closing window");
                break;
            }

            self.draw(session);
        }
    }

    fn draw<H: Host>(&mut self, session: &Session<H>) {
        let Some(location) = session.current() else {
            return;
        };

        if self.shown_location.as_deref() != Some(location.id()) {
            self.context.set_background(location.background());
            self.shown_location = Some(location.id().to_string());
        }

        let (x_scroll, y_scroll) = location.camera().scroll();
        self.context.set_offset(x_scroll, y_scroll);

        let alpha = location.fade_alpha();
        let faded = |(r, g, b, a): (f32, f32, f32, f32)| (r, g, b, a * alpha);
        for zone in location.triggers().iter() {
            let color = if location.is_hint_active(&zone.tag) {
                HINT_COLOR
            } else {
                TRIGGER_COLOR
            };
            self.context.draw_rect(&zone.area, faded(color));
        }

        for obstacle in location.obstacles().iter() {
            self.context.draw_rect(&obstacle.rect, faded(obstacle.kind.debug_color()));
        }

        self.context.draw_rect(&location.player_box(), faded(PLAYER_COLOR));
        self.context.render(alpha);
    }
}
