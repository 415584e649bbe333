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

use crate::assets::AssetError;
use crate::host::MusicPlayer;
use sdl2::mixer;
use std::path::PathBuf;
use tracing::debug;

/// Open the mixer. The returned context must outlive all playback.
pub fn init_audio() -> Result<mixer::Sdl2MixerContext, String> {
    mixer::open_audio(44100, mixer::AUDIO_S16LSB, mixer::DEFAULT_CHANNELS, 1024)?;
    let context = mixer::init(mixer::InitFlag::MP3)?;
    mixer::allocate_channels(4);
    Ok(context)
}

/// Background music through the SDL mixer. Paths are relative to `root`.
pub struct MixerMusic {
    root: PathBuf,
    current: Option<mixer::Music<'static>>,
}

impl MixerMusic {
    pub fn new(root: PathBuf) -> MixerMusic {
        MixerMusic { root, current: None }
    }
}

impl MusicPlayer for MixerMusic {
    fn play_music(&mut self, path: &str) -> Result<(), AssetError> {
        let full_path = self.root.join(path);
        if !full_path.exists() {
            return Err(AssetError::Missing(full_path.display().to_string()));
        }

        let music = mixer::Music::from_file(&full_path).map_err(AssetError::Audio)?;
        music.play(-1).map_err(AssetError::Audio)?;
        debug!(path = path, "music started");
        self.current = Some(music);
        Ok(())
    }

    fn stop_music(&mut self) {
        if self.current.take().is_some() {
            mixer::Music::halt();
        }
    }
}
