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

/// Eases a value from `start_value` to `end_value` over `max_t` seconds.
#[derive(Clone, Copy, Debug)]
pub struct Interpolator {
    t: f32,
    max_t: f32,
    start_value: f32,
    end_value: f32,
    value: f32,
    easing_fn: fn(f32) -> f32,
}

pub fn cubic_inout(x: f32) -> f32 {
    if x < 0.5 { 4.0 * x * x * x } else { 1.0 - (-2.0 * x + 2.0).powf(3.0) / 2.0 }
}

pub fn linear(x: f32) -> f32 {
    x
}

impl Interpolator {
    pub fn new(value: f32, easing_fn: fn(f32) -> f32) -> Interpolator {
        Interpolator {
            t: 1.0,
            max_t: 1.0,
            start_value: value,
            end_value: value,
            value,
            easing_fn,
        }
    }

    pub fn start(&mut self, time: f32, start: f32, end: f32) {
        self.start_value = start;
        self.end_value = end;
        self.value = start;
        self.t = 0.0;
        self.max_t = time;
        if time <= 0.0 {
            self.t = self.max_t;
            self.value = end;
        }
    }

    pub fn update(&mut self, d_t: f32) -> f32 {
        if self.t < self.max_t {
            self.t = (self.t + d_t).min(self.max_t);
            let x = self.t / self.max_t;
            self.value =
                self.start_value + (self.easing_fn)(x) * (self.end_value - self.start_value);
        } else {
            self.value = self.end_value;
        }

        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_done(&self) -> bool {
        self.t >= self.max_t
    }
}
