//! Track descriptor: the one audio file the card plays and shows.
//!
//! A `Track` is probed once at startup from the file's tags and stays
//! immutable for the lifetime of the card.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;

/// A playable track and its display metadata.
#[derive(Clone)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Duration hint from the tag probe; the playback engine refines it
    /// once the file is decoded.
    pub duration: Option<Duration>,
    /// Raw bytes of the embedded cover picture, if any.
    pub art: Option<Vec<u8>>,
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("path", &self.path)
            .field("title", &self.title)
            .field("artist", &self.artist)
            .field("album", &self.album)
            .field("duration", &self.duration)
            .field("art", &self.art.as_ref().map(|b| format!("{} bytes", b.len())))
            .finish()
    }
}

impl Track {
    /// Probe `path` for tags, duration and embedded art.
    ///
    /// Never fails: an unreadable or untagged file still yields a
    /// descriptor with the file stem as title and everything else absent.
    pub fn probe(path: &Path) -> Self {
        let default_title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let mut title = default_title;
        let mut artist: Option<String> = None;
        let mut album: Option<String> = None;
        let mut duration: Option<Duration> = None;
        let mut art: Option<Vec<u8>> = None;

        if let Ok(tagged) = lofty::read_from_path(path) {
            duration = Some(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
                if let Some(v) = tag.get_string(ItemKey::AlbumTitle) {
                    let v = v.trim();
                    if !v.is_empty() {
                        album = Some(v.to_string());
                    }
                }
                if let Some(pic) = tag.pictures().first() {
                    art = Some(pic.data().to_vec());
                }
            }
        }

        Self {
            path: path.to_path_buf(),
            title,
            artist,
            album,
            duration,
            art,
        }
    }

    /// "Artist - Title" when an artist is known, bare title otherwise.
    pub fn label(&self) -> String {
        match self.artist.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(a) => format!("{} - {}", a, self.title),
            None => self.title.clone(),
        }
    }
}
