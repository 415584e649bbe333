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

use std::time::Duration;

/// Turns the monotonic timestamps handed to each frame callback into frame
/// lengths. The first frame after creation or `reset` has zero length.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last: Option<Duration>,
}

impl FrameClock {
    pub fn new() -> FrameClock {
        FrameClock { last: None }
    }

    /// Seconds since the previous tick. A timestamp that goes backwards
    /// yields a zero-length frame.
    pub fn tick(&mut self, now: Duration) -> f32 {
        let d_t = match self.last {
            Some(last) => now.saturating_sub(last).as_secs_f32(),
            None => 0.0,
        };

        self.last = Some(now);
        d_t
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Duration::from_millis(5000)), 0.0);
        assert!((clock.tick(Duration::from_millis(5100)) - 0.1).abs() < 1e-6);
        assert!((clock.tick(Duration::from_millis(5116)) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_and_reset() {
        let mut clock = FrameClock::new();
        clock.tick(Duration::from_secs(10));
        assert_eq!(clock.tick(Duration::from_secs(9)), 0.0);
        assert_eq!(clock.tick(Duration::from_secs(11)), 2.0);

        clock.reset();
        assert_eq!(clock.tick(Duration::from_secs(20)), 0.0);
    }
}
