use log::trace;

use crate::stage::Stage;

pub const EFFECT_VOLUME: f32 = 0.35;
pub const MUSIC_VOLUME: f32 = 0.12;

/// Every sound the game can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    MenuClick,
    MenuSelect,
    StageSelect,
    MenuMusic,
    StageMusic(Stage),
}

impl Cue {
    pub const ALL: [Cue; 7] = [
        Cue::MenuClick,
        Cue::MenuSelect,
        Cue::StageSelect,
        Cue::MenuMusic,
        Cue::StageMusic(Stage::One),
        Cue::StageMusic(Stage::Two),
        Cue::StageMusic(Stage::Three),
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Cue::MenuClick => "menu_click.wav",
            Cue::MenuSelect => "menu_select.wav",
            Cue::StageSelect => "stage_select.wav",
            Cue::MenuMusic => "menu_bgm.mp3",
            Cue::StageMusic(Stage::One) => "stage1_bgm.mp3",
            Cue::StageMusic(Stage::Two) => "stage2_bgm.mp3",
            Cue::StageMusic(Stage::Three) => "stage3_bgm.mp3",
        }
    }

    /// Music loops and replaces whatever music was playing.
    pub fn is_music(self) -> bool {
        matches!(self, Cue::MenuMusic | Cue::StageMusic(_))
    }

    /// Whether this cue needs a new player while `playing` is the current track.
    /// Effects always do; music only when the track changes.
    pub fn starts_player(self, playing: Option<Cue>) -> bool {
        !self.is_music() || playing != Some(self)
    }
}

/// Fire-and-forget sound playback. Implementations restart or reuse their
/// players internally; callers never wait on a result.
pub trait SoundCue {
    fn play(&mut self, cue: Cue);
}

/// Plays nothing. Used when muted or built without the `audio` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl SoundCue for SilentCues {
    fn play(&mut self, cue: Cue) {
        trace!("muted cue {cue:?}");
    }
}

#[cfg(feature = "audio")]
pub use rodio_cues::RodioCues;

#[cfg(feature = "audio")]
mod rodio_cues {
    use std::io::Cursor;
    use std::sync::Arc;

    use log::warn;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::{Cue, SoundCue, EFFECT_VOLUME, MUSIC_VOLUME};
    use crate::assets::{AssetCache, AssetKind};
    use crate::error::{GameError, Result};

    /// Sound output through the default audio device.
    pub struct RodioCues {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        assets: AssetCache,
        music: Option<(Cue, Sink)>,
    }

    impl RodioCues {
        /// Opens the output device and loads every cue file up front.
        pub fn new(mut assets: AssetCache) -> Result<Self> {
            let names: Vec<&str> = Cue::ALL.iter().map(|c| c.file_name()).collect();
            assets.ensure_loaded(AssetKind::Audio, &names)?;

            let (stream, handle) =
                OutputStream::try_default().map_err(|e| GameError::Audio(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
                assets,
                music: None,
            })
        }

        fn source(&mut self, cue: Cue) -> Option<Decoder<Cursor<Arc<[u8]>>>> {
            let bytes = match self.assets.load_audio(cue.file_name()) {
                Ok(handle) => handle.bytes(),
                Err(e) => {
                    warn!("{e}");
                    return None;
                }
            };
            match Decoder::new(Cursor::new(bytes)) {
                Ok(source) => Some(source),
                Err(e) => {
                    warn!("could not decode {}: {e}", cue.file_name());
                    None
                }
            }
        }
    }

    impl SoundCue for RodioCues {
        fn play(&mut self, cue: Cue) {
            if !cue.starts_player(self.music.as_ref().map(|(current, _)| *current)) {
                return;
            }
            let Some(source) = self.source(cue) else {
                return;
            };
            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!("no sink for {cue:?}: {e}");
                    return;
                }
            };

            if cue.is_music() {
                sink.set_volume(MUSIC_VOLUME);
                sink.append(source.repeat_infinite());
                if let Some((_, old)) = self.music.replace((cue, sink)) {
                    old.stop();
                }
            } else {
                sink.set_volume(EFFECT_VOLUME);
                sink.append(source);
                sink.detach();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cue_has_a_distinct_file() {
        let mut names: Vec<_> = Cue::ALL.iter().map(|c| c.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Cue::ALL.len());
    }

    #[test]
    fn only_background_tracks_are_music() {
        assert!(Cue::MenuMusic.is_music());
        assert!(Cue::StageMusic(Stage::Two).is_music());
        assert!(!Cue::MenuClick.is_music());
        assert!(!Cue::StageSelect.is_music());
    }

    #[test]
    fn music_already_playing_is_not_restarted() {
        let menu = Some(Cue::MenuMusic);
        assert!(!Cue::MenuMusic.starts_player(menu));
        assert!(Cue::StageMusic(Stage::One).starts_player(menu));
        assert!(Cue::MenuMusic.starts_player(None));
        assert!(!Cue::StageMusic(Stage::Three).starts_player(Some(Cue::StageMusic(Stage::Three))));
        assert!(Cue::StageMusic(Stage::Three).starts_player(Some(Cue::StageMusic(Stage::Two))));
    }

    #[test]
    fn effects_always_play() {
        assert!(Cue::MenuClick.starts_player(Some(Cue::MenuMusic)));
        assert!(Cue::MenuSelect.starts_player(None));
        assert!(Cue::StageSelect.starts_player(Some(Cue::StageSelect)));
    }
}
