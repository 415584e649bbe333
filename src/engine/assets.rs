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

use image::ImageReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("missing resource: {0}")]
    Missing(String),

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("could not decode {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },

    #[error("audio error: {0}")]
    Audio(String),
}

/// What gets drawn behind a location. Collision never looks at this.
#[derive(Clone, Debug)]
pub enum Background {
    Image(image::RgbaImage),
    Placeholder(String),
}

impl Background {
    pub fn placeholder_for(path: &str) -> Background {
        Background::Placeholder(format!("Background unavailable: {}", path))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Background::Placeholder(_))
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        match self {
            Background::Image(img) => Some(img.dimensions()),
            Background::Placeholder(_) => None,
        }
    }
}

pub fn load_background(path: &Path) -> Result<Background, AssetError> {
    let name = path.display().to_string();
    if !path.exists() {
        return Err(AssetError::Missing(name));
    }

    let reader = ImageReader::open(path).map_err(|source| AssetError::Io {
        path: name.clone(),
        source,
    })?;
    let decoded = reader
        .decode()
        .map_err(|source| AssetError::Decode { path: name, source })?;

    Ok(Background::Image(decoded.into_rgba8()))
}
