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

use bitflags::bitflags;

/// Keys the simulation cares about. Frontends translate their own key codes
/// into this before handing them to a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Other,
}

impl Key {
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

bitflags! {
    // One bit per physical key, so releasing W while Up is still held keeps
    // the player moving.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct HeldKeys: u32 {
        const W = 0x1;
        const S = 0x2;
        const A = 0x4;
        const D = 0x8;
        const UP = 0x10;
        const DOWN = 0x20;
        const LEFT = 0x40;
        const RIGHT = 0x80;
    }
}

fn get_key_mask(key: Key) -> HeldKeys {
    match key {
        Key::W => HeldKeys::W,
        Key::S => HeldKeys::S,
        Key::A => HeldKeys::A,
        Key::D => HeldKeys::D,
        Key::Up => HeldKeys::UP,
        Key::Down => HeldKeys::DOWN,
        Key::Left => HeldKeys::LEFT,
        Key::Right => HeldKeys::RIGHT,
        _ => HeldKeys::empty(),
    }
}

const NORTH: HeldKeys = HeldKeys::W.union(HeldKeys::UP);
const SOUTH: HeldKeys = HeldKeys::S.union(HeldKeys::DOWN);
const WEST: HeldKeys = HeldKeys::A.union(HeldKeys::LEFT);
const EAST: HeldKeys = HeldKeys::D.union(HeldKeys::RIGHT);

/// Movement keys currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    held: HeldKeys,
}

impl InputState {
    pub fn new() -> InputState {
        InputState::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held |= get_key_mask(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held &= !get_key_mask(key);
    }

    pub fn clear(&mut self) {
        self.held = HeldKeys::empty();
    }

    // Key-up events are never delivered to a window that lost focus, so
    // anything still held would stay stuck.
    pub fn focus_lost(&mut self) {
        self.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        let mask = get_key_mask(key);
        !mask.is_empty() && self.held.contains(mask)
    }

    pub fn held(&self) -> HeldKeys {
        self.held
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Net direction on each axis: -1, 0 or 1. Opposite keys cancel.
    pub fn axis(&self) -> (i32, i32) {
        let x = self.held.intersects(EAST) as i32 - self.held.intersects(WEST) as i32;
        let y = self.held.intersects(SOUTH) as i32 - self.held.intersects(NORTH) as i32;
        (x, y)
    }
}
