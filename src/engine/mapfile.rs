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

//! Location data in Tiled map format. Only the parts the simulation reads
//! are understood: the map size, map properties and three object layers
//! (`obstacles`, `triggers`, `entrances`). Tile layers are ignored.

use crate::host::{Condition, TaskId};
use crate::location::{LocationDescriptor, DEFAULT_ENTRANCE};
use crate::obstacle::{Obstacle, ObstacleKind};
use crate::trigger::{Activation, BossEncounter, TriggerAction, TriggerZone, START_RECT_TAG};
use crate::util::{Rect, Vec2};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("bad attribute: {0}")]
    Attr(#[from] AttrError),

    #[error("{element}: missing {attribute}")]
    MissingAttribute { element: String, attribute: String },

    #[error("{element}: {attribute} is not a number: {value:?}")]
    InvalidNumber {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("{element}: unknown kind {kind:?}")]
    UnknownKind { element: String, kind: String },

    #[error("{element}: invalid {attribute} {value:?}")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("{element}: rectangle must have a positive size")]
    InvalidRect { element: String },

    #[error("duplicate id {0:?}")]
    DuplicateId(String),

    #[error("map has no {0:?} entrance")]
    MissingEntrance(String),

    #[error("map has no id property")]
    MissingMapId,

    #[error("{location}: {tag} leads to unknown location {target:?}")]
    UnknownTarget {
        location: String,
        tag: String,
        target: String,
    },

    #[error("{location}: {tag} uses entrance {entrance:?} which {target} does not have")]
    UnknownEntrance {
        location: String,
        tag: String,
        target: String,
        entrance: String,
    },

    #[error("location {0:?} is defined twice")]
    DuplicateLocation(String),
}

type Properties = Vec<(String, String)>;

fn lookup<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn number(element: &str, attribute: &str, value: &str) -> Result<f32, MapError> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MapError::InvalidNumber {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

fn read_attributes(e: &BytesStart) -> Result<Properties, MapError> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        attributes.push((key, attr.unescape_value()?.into_owned()));
    }

    Ok(attributes)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Obstacles,
    Triggers,
    Entrances,
    Other,
}

#[derive(Debug, Default)]
struct RawObject {
    label: String,
    class: String,
    attributes: Properties,
    properties: Properties,
}

impl RawObject {
    fn from_attributes(attributes: Properties) -> RawObject {
        let name = lookup(&attributes, "name").unwrap_or_default();
        let label = if name.is_empty() {
            format!("object {}", lookup(&attributes, "id").unwrap_or("?"))
        } else {
            name.to_string()
        };

        // Tiled 1.9 renamed "type" to "class".
        let class = lookup(&attributes, "type")
            .or_else(|| lookup(&attributes, "class"))
            .unwrap_or_default()
            .to_string();

        RawObject {
            label,
            class,
            attributes,
            properties: Vec::new(),
        }
    }

    fn coordinate(&self, attribute: &str, default: Option<f32>) -> Result<f32, MapError> {
        match (lookup(&self.attributes, attribute), default) {
            (Some(value), _) => number(&self.label, attribute, value),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(self.missing(attribute)),
        }
    }

    fn origin(&self) -> Result<Vec2, MapError> {
        Ok(Vec2::new(self.coordinate("x", None)?, self.coordinate("y", None)?))
    }

    fn area(&self) -> Result<Rect<f32>, MapError> {
        let origin = self.origin()?;
        let rect = Rect::new(
            origin.x,
            origin.y,
            self.coordinate("width", Some(0.0))?,
            self.coordinate("height", Some(0.0))?,
        );
        if !rect.is_valid() || rect.is_empty() {
            return Err(MapError::InvalidRect {
                element: self.label.clone(),
            });
        }

        Ok(rect)
    }

    fn property(&self, key: &str) -> Option<&str> {
        lookup(&self.properties, key)
    }

    fn required(&self, key: &str) -> Result<&str, MapError> {
        self.property(key).ok_or_else(|| self.missing(key))
    }

    fn flag(&self, key: &str) -> Result<Option<bool>, MapError> {
        match self.property(key) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(value) => Err(self.invalid(key, value)),
        }
    }

    fn task(&self, key: &str) -> Result<Option<TaskId>, MapError> {
        match self.property(key) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map(|id| Some(TaskId(id)))
                .map_err(|_| MapError::InvalidNumber {
                    element: self.label.clone(),
                    attribute: key.to_string(),
                    value: value.to_string(),
                }),
        }
    }

    fn missing(&self, attribute: &str) -> MapError {
        MapError::MissingAttribute {
            element: self.label.clone(),
            attribute: attribute.to_string(),
        }
    }

    fn invalid(&self, attribute: &str, value: &str) -> MapError {
        MapError::InvalidValue {
            element: self.label.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Default)]
struct MapBuilder {
    world: Option<Vec2>,
    properties: Properties,
    layer: Option<Layer>,
    object: Option<RawObject>,
    obstacles: Vec<RawObject>,
    triggers: Vec<RawObject>,
    entrances: Vec<RawObject>,
}

impl MapBuilder {
    fn open(&mut self, e: &BytesStart, empty: bool) -> Result<(), MapError> {
        match e.name().as_ref() {
            b"map" => {
                let attributes = read_attributes(e)?;
                let get = |key: &str| {
                    lookup(&attributes, key)
                        .ok_or_else(|| MapError::MissingAttribute {
                            element: "map".to_string(),
                            attribute: key.to_string(),
                        })
                        .and_then(|value| number("map", key, value))
                };
                self.world = Some(Vec2::new(
                    get("width")? * get("tilewidth")?,
                    get("height")? * get("tileheight")?,
                ));
            }
            b"objectgroup" => {
                let attributes = read_attributes(e)?;
                self.layer = Some(match lookup(&attributes, "name") {
                    Some("obstacles") => Layer::Obstacles,
                    Some("triggers") => Layer::Triggers,
                    Some("entrances") => Layer::Entrances,
                    _ => Layer::Other,
                });
                if empty {
                    self.layer = None;
                }
            }
            b"object" => {
                let object = RawObject::from_attributes(read_attributes(e)?);
                if empty {
                    self.finish_object(object);
                } else {
                    self.object = Some(object);
                }
            }
            b"property" => {
                let attributes = read_attributes(e)?;
                let name = lookup(&attributes, "name").unwrap_or_default().to_string();
                let value = lookup(&attributes, "value").unwrap_or_default().to_string();
                if let Some(object) = &mut self.object {
                    object.properties.push((name, value));
                } else if self.layer.is_none() {
                    self.properties.push((name, value));
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"object" => {
                if let Some(object) = self.object.take() {
                    self.finish_object(object);
                }
            }
            b"objectgroup" => self.layer = None,
            _ => {}
        }
    }

    fn finish_object(&mut self, object: RawObject) {
        match self.layer {
            Some(Layer::Obstacles) => self.obstacles.push(object),
            Some(Layer::Triggers) => self.triggers.push(object),
            Some(Layer::Entrances) => self.entrances.push(object),
            Some(Layer::Other) | None => {}
        }
    }

    fn build(self) -> Result<LocationDescriptor, MapError> {
        let id = lookup(&self.properties, "id")
            .filter(|id| !id.is_empty())
            .ok_or(MapError::MissingMapId)?
            .to_string();
        let world = self.world.ok_or_else(|| MapError::MissingAttribute {
            element: "map".to_string(),
            attribute: "width".to_string(),
        })?;

        let start_rect = match lookup(&self.properties, "start_rect") {
            None => None,
            Some("exit") => Some(TriggerAction::Exit {
                to: lookup(&self.properties, "exit_to").map(String::from),
            }),
            Some("return") => Some(TriggerAction::Return),
            Some(value) => {
                return Err(MapError::InvalidValue {
                    element: id,
                    attribute: "start_rect".to_string(),
                    value: value.to_string(),
                })
            }
        };

        let mut seen = HashSet::new();
        let mut obstacles = Vec::new();
        for raw in &self.obstacles {
            if !seen.insert(raw.label.clone()) {
                return Err(MapError::DuplicateId(raw.label.clone()));
            }
            obstacles.push(build_obstacle(raw)?);
        }

        let mut seen = HashSet::new();
        if start_rect.is_some() {
            seen.insert(START_RECT_TAG.to_string());
        }
        let mut triggers = Vec::new();
        for raw in &self.triggers {
            if !seen.insert(raw.label.clone()) {
                return Err(MapError::DuplicateId(raw.label.clone()));
            }
            triggers.push(build_trigger(raw)?);
        }

        let mut entrances: Vec<(String, Vec2)> = Vec::new();
        for raw in &self.entrances {
            if entrances.iter().any(|(name, _)| *name == raw.label) {
                return Err(MapError::DuplicateId(raw.label.clone()));
            }
            entrances.push((raw.label.clone(), raw.origin()?));
        }
        if !entrances.iter().any(|(name, _)| name == DEFAULT_ENTRANCE) {
            return Err(MapError::MissingEntrance(DEFAULT_ENTRANCE.to_string()));
        }

        let name = lookup(&self.properties, "name").unwrap_or(&id).to_string();
        Ok(LocationDescriptor {
            name,
            world,
            background: lookup(&self.properties, "background").unwrap_or_default().to_string(),
            music: lookup(&self.properties, "music").unwrap_or_default().to_string(),
            entrances,
            obstacles,
            triggers,
            start_rect,
            id,
        })
    }
}

fn build_obstacle(raw: &RawObject) -> Result<Obstacle, MapError> {
    let kind = ObstacleKind::from_name(&raw.class).ok_or_else(|| MapError::UnknownKind {
        element: raw.label.clone(),
        kind: raw.class.clone(),
    })?;

    let mut obstacle = Obstacle::new(&raw.label, kind, raw.area()?);
    if let Some(solid) = raw.flag("solid")? {
        obstacle = obstacle.with_blocking(solid);
    }
    if let Some(task) = raw.task("while_pending")? {
        obstacle = obstacle.with_condition(Condition::WhileTaskPending(task));
    }

    Ok(obstacle)
}

fn build_trigger(raw: &RawObject) -> Result<TriggerZone, MapError> {
    let area = raw.area()?;
    let action = match raw.class.as_str() {
        "exit" => TriggerAction::Exit {
            to: raw.property("to").map(String::from),
        },
        "advance" => TriggerAction::Advance {
            to: raw.required("to")?.to_string(),
            entrance: raw.property("entrance").map(String::from),
        },
        "return" => TriggerAction::Return,
        "boss" => TriggerAction::Boss(BossEncounter {
            boss: raw.property("boss").unwrap_or(raw.label.as_str()).to_string(),
            task: raw.task("task")?,
            background: raw.property("background").unwrap_or_default().to_string(),
            music: raw.property("music").unwrap_or_default().to_string(),
        }),
        "interact" => TriggerAction::Interact,
        "hint" => TriggerAction::None,
        _ => {
            return Err(MapError::UnknownKind {
                element: raw.label.clone(),
                kind: raw.class.clone(),
            })
        }
    };

    let passive = action == TriggerAction::None;
    let activation = match raw.property("activation") {
        None if passive => Activation::Never,
        None | Some("confirm") => Activation::Confirm,
        Some("contact") => Activation::Contact,
        Some("never") => Activation::Never,
        Some(value) => return Err(raw.invalid("activation", value)),
    };

    // Boss zones vanish once their fight is won unless told otherwise.
    let condition = match (raw.task("while_pending")?, &action) {
        (Some(task), _) => Condition::WhileTaskPending(task),
        (None, TriggerAction::Boss(BossEncounter { task: Some(task), .. })) => {
            Condition::WhileTaskPending(*task)
        }
        _ => Condition::Always,
    };

    Ok(TriggerZone {
        area,
        tag: raw.label.clone(),
        action,
        activation,
        hint: raw.flag("hint")?.unwrap_or(passive),
        condition,
    })
}

/// Parse one map. Malformed or inconsistent data is an error here rather
/// than a surprise at runtime.
pub fn parse_map(text: &str) -> Result<LocationDescriptor, MapError> {
    let mut reader = Reader::from_str(text);
    let mut builder = MapBuilder::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => builder.open(&e, false)?,
            Event::Empty(e) => builder.open(&e, true)?,
            Event::End(e) => builder.close(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    builder.build()
}

pub fn load_map(path: &Path) -> Result<LocationDescriptor, MapError> {
    let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_map(&text)
}
