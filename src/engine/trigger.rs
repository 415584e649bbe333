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

use crate::host::{Condition, TaskId};
use crate::util::{Rect, Vec2};

pub const START_RECT_TAG: &str = "start_rect";

#[derive(Clone, Debug, PartialEq)]
pub struct BossEncounter {
    pub boss: String,
    // Task that is finished once the boss is beaten. Boss obstacles and
    // triggers carry a matching condition so they disappear afterwards.
    pub task: Option<TaskId>,
    pub background: String,
    pub music: String,
}

/// What happens when a zone fires.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerAction {
    /// Leave the location chain, saving on the way out. `to` names the
    /// location to load next; None ends the session.
    Exit { to: Option<String> },

    /// Enter another location on top of this one (stairs, doors).
    Advance {
        to: String,
        entrance: Option<String>,
    },

    /// Back to the location this one was entered from.
    Return,

    Boss(BossEncounter),

    /// Hand over to the host (shop counter, NPC).
    Interact,

    /// Highlight only.
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    /// Fires once per confirm press while the player overlaps it.
    #[default]
    Confirm,

    /// Fires as soon as the player overlaps it.
    Contact,

    Never,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TriggerZone {
    pub area: Rect<f32>,
    pub tag: String,
    pub action: TriggerAction,
    pub activation: Activation,
    // Re-evaluated every frame to drive an on-screen highlight.
    pub hint: bool,
    pub condition: Condition,
}

impl TriggerZone {
    pub fn new(tag: &str, area: Rect<f32>, action: TriggerAction) -> TriggerZone {
        TriggerZone {
            area,
            tag: tag.to_string(),
            action,
            activation: Activation::Confirm,
            hint: false,
            condition: Condition::Always,
        }
    }

    pub fn hint_only(tag: &str, area: Rect<f32>) -> TriggerZone {
        TriggerZone {
            activation: Activation::Never,
            hint: true,
            ..TriggerZone::new(tag, area, TriggerAction::None)
        }
    }

    /// The "back to the map" rectangle around where the player appears.
    pub fn around_spawn(
        spawn: Vec2,
        player: Vec2,
        margin: f32,
        action: TriggerAction,
    ) -> TriggerZone {
        let area = Rect::at(spawn, player).inflate(margin);
        TriggerZone {
            hint: true,
            ..TriggerZone::new(START_RECT_TAG, area, action)
        }
    }

    pub fn with_activation(mut self, activation: Activation) -> TriggerZone {
        self.activation = activation;
        self
    }

    pub fn with_hint(mut self, hint: bool) -> TriggerZone {
        self.hint = hint;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> TriggerZone {
        self.condition = condition;
        self
    }
}

/// Trigger zones for one location. They never block movement.
#[derive(Clone, Debug, Default)]
pub struct TriggerSet {
    zones: Vec<TriggerZone>,
}

impl TriggerSet {
    pub fn new(zones: Vec<TriggerZone>) -> TriggerSet {
        TriggerSet { zones }
    }

    pub fn replace(&mut self, zones: Vec<TriggerZone>) {
        self.zones = zones;
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerZone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&TriggerZone> {
        self.zones.iter().find(|z| z.tag == tag)
    }

    fn touching<'a>(&'a self, player: &Rect<f32>) -> impl Iterator<Item = &'a TriggerZone> + 'a {
        let player = *player;
        self.zones.iter().filter(move |z| z.area.overlaps(&player))
    }

    /// Tags of every zone the player box overlaps, in map order.
    pub fn test_zones(&self, player: &Rect<f32>) -> Vec<&str> {
        self.touching(player).map(|z| z.tag.as_str()).collect()
    }

    pub fn hints(&self, player: &Rect<f32>) -> Vec<&str> {
        self.touching(player)
            .filter(|z| z.hint)
            .map(|z| z.tag.as_str())
            .collect()
    }

    pub fn first_with(&self, player: &Rect<f32>, activation: Activation) -> Option<&TriggerZone> {
        self.touching(player).find(|z| z.activation == activation)
    }
}
