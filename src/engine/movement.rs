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

use crate::input::InputState;
use crate::obstacle::ObstacleSet;
use crate::util::{Rect, Vec2};

/// Facing derived from the velocity each frame. Only used to pick sprites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    None,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    // Screen coordinates: y grows downward, so north is negative y.
    pub fn from_velocity(velocity: Vec2) -> Direction {
        let x = if velocity.x > 0.0 {
            1
        } else if velocity.x < 0.0 {
            -1
        } else {
            0
        };
        let y = if velocity.y > 0.0 {
            1
        } else if velocity.y < 0.0 {
            -1
        } else {
            0
        };

        match (x, y) {
            (0, -1) => Direction::N,
            (1, -1) => Direction::NE,
            (1, 0) => Direction::E,
            (1, 1) => Direction::SE,
            (0, 1) => Direction::S,
            (-1, 1) => Direction::SW,
            (-1, 0) => Direction::W,
            (-1, -1) => Direction::NW,
            _ => Direction::None,
        }
    }
}

/// Raw velocity from the held keys. Diagonals are not normalized: each axis
/// moves at full speed.
pub fn velocity(input: &InputState, speed: f32) -> Vec2 {
    let (x, y) = input.axis();
    Vec2::new(x as f32 * speed, y as f32 * speed)
}

/// World and player dimensions that limit where the player box may go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementBounds {
    pub world: Vec2,
    pub player: Vec2,
}

impl MovementBounds {
    pub fn new(world: Vec2, player: Vec2) -> MovementBounds {
        MovementBounds { world, player }
    }

    /// Keep the whole player box inside the world. An axis with no world
    /// extent is left alone; a world narrower than the player pins it at 0.
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            clamp_axis(position.x, self.world.x, self.player.x),
            clamp_axis(position.y, self.world.y, self.player.y),
        )
    }

    pub fn player_box(&self, position: Vec2) -> Rect<f32> {
        Rect::at(position, self.player)
    }
}

fn clamp_axis(value: f32, world: f32, size: f32) -> f32 {
    if world <= 0.0 {
        return value;
    }

    value.clamp(0.0, (world - size).max(0.0))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub position: Vec2,
    pub moved: bool,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl StepOutcome {
    fn stationary(position: Vec2) -> StepOutcome {
        StepOutcome {
            position,
            moved: false,
            blocked_x: false,
            blocked_y: false,
        }
    }
}

/// Advance one frame. If the full move collides, each axis is tried on its
/// own (X first, then Y from wherever X ended up) so the player slides along
/// walls. A blocked axis stops flush against the nearest obstacle in the way.
///
/// As long as the starting box is clear, the returned box is clear too.
pub fn step(
    position: Vec2,
    velocity: Vec2,
    d_t: f32,
    bounds: &MovementBounds,
    obstacles: &ObstacleSet,
) -> StepOutcome {
    if velocity.is_zero() || d_t <= 0.0 {
        return StepOutcome::stationary(position);
    }

    let proposed = bounds.clamp(position + velocity.scaled(d_t));
    if !obstacles.blocks(&bounds.player_box(proposed)) {
        return StepOutcome {
            position: proposed,
            moved: proposed != position,
            blocked_x: false,
            blocked_y: false,
        };
    }

    let x = resolve_x(position, proposed.x, bounds.player, obstacles);
    let y = resolve_y(Vec2::new(x, position.y), proposed.y, bounds.player, obstacles);
    let end = Vec2::new(x, y);
    StepOutcome {
        position: end,
        moved: end != position,
        blocked_x: x != proposed.x,
        blocked_y: y != proposed.y,
    }
}

fn resolve_x(from: Vec2, to_x: f32, size: Vec2, obstacles: &ObstacleSet) -> f32 {
    if to_x == from.x {
        return from.x;
    }

    if !obstacles.blocks(&Rect::new(to_x, from.y, size.x, size.y)) {
        return to_x;
    }

    let swept = Rect::new(
        from.x.min(to_x),
        from.y,
        (to_x - from.x).abs() + size.x,
        size.y,
    );
    let moving_right = to_x > from.x;
    let mut x = to_x;
    for obstacle in obstacles.blocking_overlaps(&swept) {
        x = if moving_right {
            x.min(obstacle.rect.left - size.x)
        } else {
            x.max(obstacle.rect.right())
        };
    }

    x = if moving_right { x.max(from.x) } else { x.min(from.x) };

    // Rounding can leave the contact point a hair inside the obstacle.
    if obstacles.blocks(&Rect::new(x, from.y, size.x, size.y)) {
        from.x
    } else {
        x
    }
}

fn resolve_y(from: Vec2, to_y: f32, size: Vec2, obstacles: &ObstacleSet) -> f32 {
    if to_y == from.y {
        return from.y;
    }

    if !obstacles.blocks(&Rect::new(from.x, to_y, size.x, size.y)) {
        return to_y;
    }

    let swept = Rect::new(
        from.x,
        from.y.min(to_y),
        size.x,
        (to_y - from.y).abs() + size.y,
    );
    let moving_down = to_y > from.y;
    let mut y = to_y;
    for obstacle in obstacles.blocking_overlaps(&swept) {
        y = if moving_down {
            y.min(obstacle.rect.top - size.y)
        } else {
            y.max(obstacle.rect.bottom())
        };
    }

    y = if moving_down { y.max(from.y) } else { y.min(from.y) };

    if obstacles.blocks(&Rect::new(from.x, y, size.x, size.y)) {
        from.y
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::obstacle::{Obstacle, ObstacleKind};

    const PLAYER: Vec2 = Vec2::new(48.0, 48.0);

    fn bounds() -> MovementBounds {
        MovementBounds::new(Vec2::new(1000.0, 800.0), PLAYER)
    }

    fn blocks(rects: &[(f32, f32, f32, f32)]) -> ObstacleSet {
        ObstacleSet::new(
            rects
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    Obstacle::new(
                        &format!("block{}", i),
                        ObstacleKind::Block,
                        Rect::new(r.0, r.1, r.2, r.3),
                    )
                })
                .collect(),
        )
    }

    fn held(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.press(*key);
        }
        input
    }

    #[test]
    fn test_velocity() {
        assert_eq!(velocity(&held(&[Key::Right]), 180.0), Vec2::new(180.0, 0.0));
        assert_eq!(velocity(&held(&[Key::W, Key::A]), 100.0), Vec2::new(-100.0, -100.0));
        assert_eq!(velocity(&held(&[Key::Left, Key::D]), 100.0), Vec2::ZERO);
        assert_eq!(
            velocity(&held(&[Key::Up, Key::Down, Key::Right]), 100.0),
            Vec2::new(100.0, 0.0)
        );
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::from_velocity(Vec2::ZERO), Direction::None);
        assert_eq!(Direction::from_velocity(Vec2::new(0.0, -1.0)), Direction::N);
        assert_eq!(Direction::from_velocity(Vec2::new(5.0, -1.0)), Direction::NE);
        assert_eq!(Direction::from_velocity(Vec2::new(5.0, 0.0)), Direction::E);
        assert_eq!(Direction::from_velocity(Vec2::new(5.0, 5.0)), Direction::SE);
        assert_eq!(Direction::from_velocity(Vec2::new(0.0, 5.0)), Direction::S);
        assert_eq!(Direction::from_velocity(Vec2::new(-5.0, 5.0)), Direction::SW);
        assert_eq!(Direction::from_velocity(Vec2::new(-5.0, 0.0)), Direction::W);
        assert_eq!(Direction::from_velocity(Vec2::new(-5.0, -5.0)), Direction::NW);
    }

    #[test]
    fn test_free_move() {
        let v = velocity(&held(&[Key::Right]), 180.0);
        let out = step(Vec2::new(100.0, 100.0), v, 0.1, &bounds(), &ObstacleSet::default());
        assert!((out.position.x - 118.0).abs() < 1e-4);
        assert_eq!(out.position.y, 100.0);
        assert!(out.moved);
        assert!(!out.blocked_x && !out.blocked_y);
    }

    #[test]
    fn test_idle_does_not_move() {
        let out = step(Vec2::new(10.0, 20.0), Vec2::ZERO, 0.5, &bounds(), &ObstacleSet::default());
        assert_eq!(out.position, Vec2::new(10.0, 20.0));
        assert!(!out.moved);

        let none = ObstacleSet::default();
        let out = step(Vec2::new(10.0, 20.0), Vec2::new(100.0, 0.0), 0.0, &bounds(), &none);
        assert_eq!(out.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_clamped_to_world() {
        let b = bounds();
        let cases = [
            (Vec2::new(0.0, 0.0), Vec2::new(-180.0, -180.0)),
            (Vec2::new(950.0, 750.0), Vec2::new(180.0, 180.0)),
            (Vec2::new(500.0, 400.0), Vec2::new(180.0, -180.0)),
            (Vec2::new(940.0, 10.0), Vec2::new(180.0, -180.0)),
        ];
        for (start, v) in cases {
            for d_t in [0.0, 0.016, 0.1, 1.0, 30.0] {
                let p = step(start, v, d_t, &b, &ObstacleSet::default()).position;
                assert!(p.x >= 0.0 && p.x <= 1000.0 - 48.0, "{:?}", p);
                assert!(p.y >= 0.0 && p.y <= 800.0 - 48.0, "{:?}", p);
            }
        }
    }

    #[test]
    fn test_degenerate_world() {
        // No extent: unconstrained.
        let open = MovementBounds::new(Vec2::ZERO, PLAYER);
        let none = ObstacleSet::default();
        let p = step(Vec2::ZERO, Vec2::new(-100.0, 100.0), 1.0, &open, &none);
        assert_eq!(p.position, Vec2::new(-100.0, 100.0));

        // Narrower than the player: pinned to the left edge.
        let tight = MovementBounds::new(Vec2::new(20.0, 800.0), PLAYER);
        let p = step(Vec2::ZERO, Vec2::new(100.0, 0.0), 1.0, &tight, &none);
        assert_eq!(p.position.x, 0.0);
    }

    #[test]
    fn test_stops_flush_against_obstacle() {
        let obstacles = blocks(&[(140.0, 100.0, 40.0, 40.0)]);
        let v = Vec2::new(180.0, 0.0);
        let out = step(Vec2::new(60.0, 100.0), v, 0.3, &bounds(), &obstacles);
        assert_eq!(out.position, Vec2::new(92.0, 100.0));
        assert!(out.blocked_x);
        assert!(!obstacles.blocks(&Rect::at(out.position, PLAYER)));

        // Already touching: stays put.
        let again = step(out.position, v, 0.3, &bounds(), &obstacles);
        assert_eq!(again.position, out.position);
        assert!(!again.moved);
    }

    #[test]
    fn test_stops_flush_moving_left_and_up() {
        let obstacles = blocks(&[(0.0, 0.0, 100.0, 100.0)]);
        let out = step(Vec2::new(130.0, 20.0), Vec2::new(-180.0, 0.0), 1.0, &bounds(), &obstacles);
        assert_eq!(out.position, Vec2::new(100.0, 20.0));

        let out = step(Vec2::new(20.0, 130.0), Vec2::new(0.0, -180.0), 1.0, &bounds(), &obstacles);
        assert_eq!(out.position, Vec2::new(20.0, 100.0));
    }

    #[test]
    fn test_no_tunneling() {
        // Obstacle as wide as the largest displacement used.
        let obstacles = blocks(&[(300.0, 300.0, 60.0, 60.0)]);
        let b = bounds();
        let starts = [
            Vec2::new(200.0, 300.0),
            Vec2::new(251.0, 310.0),
            Vec2::new(252.0, 280.0),
            Vec2::new(300.0, 200.0),
            Vec2::new(380.0, 330.0),
        ];
        let velocities = [
            Vec2::new(60.0, 0.0),
            Vec2::new(-60.0, 0.0),
            Vec2::new(0.0, 60.0),
            Vec2::new(60.0, 60.0),
            Vec2::new(-60.0, -60.0),
        ];
        for start in starts {
            assert!(!obstacles.blocks(&Rect::at(start, PLAYER)));
            for v in velocities {
                let mut p = start;
                for _ in 0..20 {
                    p = step(p, v, 1.0, &b, &obstacles).position;
                    assert!(!obstacles.blocks(&Rect::at(p, PLAYER)), "{:?} {:?}", start, p);
                }
            }
        }
    }

    #[test]
    fn test_slides_along_wall() {
        // Wall to the right, open above and below.
        let obstacles = blocks(&[(148.0, 0.0, 50.0, 800.0)]);
        let v = velocity(&held(&[Key::Right, Key::Down]), 100.0);
        let out = step(Vec2::new(100.0, 100.0), v, 0.1, &bounds(), &obstacles);
        assert_eq!(out.position.x, 100.0);
        assert!((out.position.y - 110.0).abs() < 1e-4);
        assert!(out.blocked_x);
        assert!(!out.blocked_y);
    }

    #[test]
    fn test_slides_along_floor() {
        let obstacles = blocks(&[(0.0, 148.0, 1000.0, 50.0)]);
        let v = velocity(&held(&[Key::Left, Key::Down]), 100.0);
        let out = step(Vec2::new(100.0, 100.0), v, 0.1, &bounds(), &obstacles);
        assert!((out.position.x - 90.0).abs() < 1e-4);
        assert_eq!(out.position.y, 100.0);
        assert!(out.blocked_y);
    }

    #[test]
    fn test_inside_corner() {
        // L shaped corner: wall to the right and wall below.
        let obstacles = blocks(&[(148.0, 0.0, 50.0, 800.0), (0.0, 148.0, 148.0, 50.0)]);
        let v = velocity(&held(&[Key::Right, Key::Down]), 100.0);
        let out = step(Vec2::new(100.0, 100.0), v, 0.1, &bounds(), &obstacles);
        assert_eq!(out.position, Vec2::new(100.0, 100.0));
        assert!(!out.moved);
    }

    #[test]
    fn test_outer_corner_never_overlaps() {
        // Diagonal move where each axis alone is clear but both together
        // would clip the corner of the block.
        let obstacles = blocks(&[(150.0, 150.0, 50.0, 50.0)]);
        let start = Vec2::new(100.0, 100.0);
        let out = step(start, Vec2::new(50.0, 50.0), 0.1, &bounds(), &obstacles);
        assert!(!obstacles.blocks(&Rect::at(out.position, PLAYER)));
        assert!((out.position.x - 105.0).abs() < 1e-4);
        assert_eq!(out.position.y, 102.0);
    }

    #[test]
    fn test_passes_through_doors() {
        let obstacles = ObstacleSet::new(vec![Obstacle::new(
            "door",
            ObstacleKind::Door,
            Rect::new(160.0, 100.0, 20.0, 48.0),
        )]);
        let out = step(Vec2::new(100.0, 100.0), Vec2::new(180.0, 0.0), 0.5, &bounds(), &obstacles);
        assert!((out.position.x - 190.0).abs() < 1e-4);
    }
}
