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

use crate::location::LocationDescriptor;
use crate::mapfile::{self, MapError};
use crate::trigger::TriggerAction;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Every location the game knows about, by id.
#[derive(Clone, Debug, Default)]
pub struct LocationRegistry {
    locations: BTreeMap<String, Rc<LocationDescriptor>>,
}

impl LocationRegistry {
    pub fn new() -> LocationRegistry {
        LocationRegistry::default()
    }

    pub fn insert(&mut self, descriptor: LocationDescriptor) -> Result<(), MapError> {
        if self.locations.contains_key(&descriptor.id) {
            return Err(MapError::DuplicateLocation(descriptor.id));
        }

        self.locations.insert(descriptor.id.clone(), Rc::new(descriptor));
        Ok(())
    }

    /// Parse a map and add it.
    pub fn insert_map(&mut self, text: &str) -> Result<(), MapError> {
        self.insert(mapfile::parse_map(text)?)
    }

    pub fn get(&self, id: &str) -> Option<Rc<LocationDescriptor>> {
        self.locations.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Check that every exit and advance lands somewhere real.
    pub fn validate_links(&self) -> Result<(), MapError> {
        for location in self.locations.values() {
            let links = location
                .triggers
                .iter()
                .map(|zone| (zone.tag.as_str(), &zone.action))
                .chain(location.start_rect.iter().map(|action| ("start rect", action)));

            for (tag, action) in links {
                let (target, entrance) = match action {
                    TriggerAction::Exit { to: Some(to) } => (to, None),
                    TriggerAction::Advance { to, entrance } => (to, entrance.as_ref()),
                    _ => continue,
                };

                let Some(destination) = self.locations.get(target) else {
                    return Err(MapError::UnknownTarget {
                        location: location.id.clone(),
                        tag: tag.to_string(),
                        target: target.clone(),
                    });
                };

                if let Some(entrance) = entrance {
                    if destination.entrance(entrance).is_none() {
                        return Err(MapError::UnknownEntrance {
                            location: location.id.clone(),
                            tag: tag.to_string(),
                            target: target.clone(),
                            entrance: entrance.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
