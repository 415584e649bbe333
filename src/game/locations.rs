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

use engine::mapfile::MapError;
use engine::registry::LocationRegistry;

pub const START_LOCATION: &str = "field_village";

macro_rules! map_file {
    ($id:literal) => {
        ($id, include_str!(concat!("../../assets/maps/", $id, ".tmx")))
    };
}

// Every location in the game, by the id its map declares.
pub const MAPS: &[(&str, &str)] = &[
    map_file!("field_village"),
    map_file!("kingdom_castle"),
    map_file!("castle_first_floor"),
    map_file!("castle_second_floor"),
    map_file!("castle_last_floor"),
    map_file!("forest_house"),
    map_file!("volcano_city_entrance"),
    map_file!("volcano_dungeon"),
    map_file!("jv_mayor"),
    map_file!("jv_store"),
];

pub fn load_registry() -> Result<LocationRegistry, MapError> {
    let mut registry = LocationRegistry::new();
    for (_, text) in MAPS {
        registry.insert_map(text)?;
    }

    registry.validate_links()?;
    Ok(registry)
}
