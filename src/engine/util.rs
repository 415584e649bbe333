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

use serde::{Deserialize, Serialize};

/// Axis aligned rectangle in world (pixel) coordinates.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Rect<T> {
    pub left: T,
    pub top: T,
    pub width: T,
    pub height: T,
}

impl<T: std::ops::Add<Output = T> + std::cmp::PartialOrd<T> + Clone + Copy> Rect<T> {
    pub fn new(left: T, top: T, width: T, height: T) -> Rect<T> {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    // Edges are exclusive: two rectangles that only share an edge do not
    // overlap. Everything that tests for collisions or triggers goes through
    // here, so the convention is the same everywhere.
    pub fn overlaps(&self, rect: &Rect<T>) -> bool {
        self.left < rect.right()
            && rect.left < self.right()
            && self.top < rect.bottom()
            && rect.top < self.bottom()
    }

    /// True if `rect` lies entirely inside this one (shared edges allowed).
    pub fn contains(&self, rect: &Rect<T>) -> bool {
        rect.left >= self.left
            && rect.top >= self.top
            && rect.right() <= self.right()
            && rect.bottom() <= self.bottom()
    }

    pub fn right(&self) -> T {
        self.left + self.width
    }

    pub fn bottom(&self) -> T {
        self.top + self.height
    }
}

impl<T: std::cmp::PartialOrd<T> + Default> Rect<T> {
    pub fn is_valid(&self) -> bool {
        self.width >= T::default() && self.height >= T::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == T::default() || self.height == T::default()
    }
}

impl Rect<f32> {
    pub fn at(position: Vec2, size: Vec2) -> Rect<f32> {
        Rect::new(position.x, position.y, size.x, size.y)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Rect<f32> {
        Rect::new(
            self.left - margin,
            self.top - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn scaled(&self, factor: f32) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}
