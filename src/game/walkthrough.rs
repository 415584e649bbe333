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

//! Scripted play for running without a window: out to the forest house and
//! back, then up through the castle to the dark knight and one floor down
//! again.

use engine::host::Host;
use engine::input::Key;
use engine::session::Session;
use std::time::Duration;
use tracing::info;

pub const FRAME: Duration = Duration::from_nanos(16_666_667);

#[derive(Clone, Copy, Debug)]
pub enum Step {
    Wait(f32),
    Hold(&'static [Key], f32),
    Confirm,
}

// Long enough for the fade in and the handoff that follows a confirm.
const SETTLE: Step = Step::Wait(1.0);

pub const CASTLE_RUN: &[Step] = &[
    SETTLE,
    // Village, down to the forest path.
    Step::Hold(&[Key::Down], 3.0),
    Step::Hold(&[Key::Left], 4.0),
    Step::Confirm,
    SETTLE,
    // Forest house, straight back out.
    Step::Confirm,
    SETTLE,
    // Village again, up to the castle gate.
    Step::Hold(&[Key::Up], 1.5),
    Step::Confirm,
    SETTLE,
    // Kingdom castle, stairs in the top right corner.
    Step::Hold(&[Key::Right], 3.0),
    Step::Hold(&[Key::Up], 3.0),
    Step::Confirm,
    SETTLE,
    // First floor, stairs top left.
    Step::Hold(&[Key::A], 5.0),
    Step::Confirm,
    SETTLE,
    // Second floor, stairs bottom right.
    Step::Hold(&[Key::S], 3.0),
    Step::Hold(&[Key::D], 5.0),
    Step::Confirm,
    SETTLE,
    // Last floor, walk into the dark knight.
    Step::Hold(&[Key::W], 3.0),
    Step::Confirm,
    Step::Wait(2.0),
    // And back down the stairs.
    Step::Hold(&[Key::S], 3.0),
    Step::Confirm,
    SETTLE,
];

/// Runs a script against the session one fixed frame at a time, stopping
/// early once `max_frames` frames have run or the session ends.
pub struct Walkthrough {
    now: Duration,
    frames: u64,
    max_frames: Option<u64>,
    location: Option<String>,
}

impl Walkthrough {
    pub fn new(max_frames: Option<u64>) -> Walkthrough {
        Walkthrough {
            now: Duration::ZERO,
            frames: 0,
            max_frames,
            location: None,
        }
    }

    fn is_done<H: Host>(&self, session: &Session<H>) -> bool {
        session.is_finished() || self.max_frames.is_some_and(|max| self.frames >= max)
    }

    fn frame<H: Host>(&mut self, session: &mut Session<H>) {
        if self.is_done(session) {
            return;
        }

        session.tick(self.now);
        self.now += FRAME;
        self.frames += 1;

        let current = session.current().map(|c| c.id().to_string());
        if current != self.location {
            let position = session.player().position;
            info!(
                frame = self.frames,
                location = current.as_deref().unwrap_or("-"),
                x = position.x,
                y = position.y,
                "now in"
            );
            self.location = current;
        }
    }

    fn frames_for(seconds: f32) -> u32 {
        (seconds / FRAME.as_secs_f32()).round() as u32
    }

    /// Returns the number of frames run.
    pub fn run<H: Host>(&mut self, session: &mut Session<H>, steps: &[Step]) -> u64 {
        for step in steps {
            if self.is_done(session) {
                break;
            }

            match *step {
                Step::Wait(seconds) => {
                    for _ in 0..Self::frames_for(seconds) {
                        self.frame(session);
                    }
                }
                Step::Hold(keys, seconds) => {
                    for key in keys {
                        session.key_down(*key);
                    }
                    for _ in 0..Self::frames_for(seconds) {
                        self.frame(session);
                    }
                    for key in keys {
                        session.key_up(*key);
                    }
                }
                Step::Confirm => {
                    session.key_down(Key::Enter);
                    self.frame(session);
                    session.key_up(Key::Enter);
                }
            }
        }

        self.frames
    }
}
