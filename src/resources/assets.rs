//! Asset loading.
//!
//! Everything here runs at startup or while a level is built, never inside a
//! tick. Two file formats are read:
//!
//! # Animation manifest (`animations.json`)
//!
//! ```json
//! {
//!   "{dir}_idle": { "dir": "character/{dir}_idle", "duration": 0.25 },
//!   "{dir}_hoe":  { "frames": ["character/{dir}_hoe/0", "character/{dir}_hoe/1"],
//!                   "durations": [0.3, 0.15], "looped": false }
//! }
//! ```
//!
//! A key containing `{dir}` is expanded into `up`, `down`, `left` and
//! `right` variants, with the placeholder also substituted in `dir` and
//! `frames`. `dir` lists the directory's `*.png` files in numeric order.
//! `looped` defaults to `true`.
//!
//! # Level file (`levels/*.json`)
//!
//! ```json
//! { "name": "farm", "tile_size": 64, "rows": ["##########", "#..@..gg.#", "##########"] }
//! ```
//!
//! | glyph | tile |
//! |-------|------|
//! | `.` | ground |
//! | `g` | farmable grass |
//! | `#` | wall / fence |
//! | `~` | water |
//! | `f` | house floor |
//! | `B` | house floor with the bed |
//! | `$` | ground with the trader |
//! | `T` / `L` | small / large tree on blocked ground |
//! | `*` | wildflower on blocked ground |
//! | `@` | player start (ground) |

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::components::actor::Facing;
use crate::error::{GameError, GameResult};
use crate::resources::animationstore::{AnimationStore, FrameDurations, FrameId, Timeline};
use crate::resources::tilegrid::{GridCoord, Interactable, Tile, TileKind, TileWorldGrid};

pub const DIR_PLACEHOLDER: &str = "{dir}";

/// Loads assets for the core. Implementations decide where bytes come from.
pub trait AssetLoader {
    /// Ordered frame ids of an image sequence directory.
    fn load_image_sequence(&self, path: &str) -> GameResult<Vec<FrameId>>;
    /// Level template from a level file.
    fn load_tileset(&self, path: &str) -> GameResult<LevelTemplate>;
    /// Every timeline listed in an animation manifest.
    fn load_animations(&self, path: &str) -> GameResult<AnimationStore>;
}

/// Static decoration or obstacle placed by the level file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    SmallTree,
    LargeTree,
    Wildflower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropSpawn {
    pub kind: PropKind,
    pub coord: GridCoord,
}

/// A level as loaded from disk; the level screen builds its world from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTemplate {
    pub name: String,
    pub grid: TileWorldGrid,
    pub start: GridCoord,
    pub props: Vec<PropSpawn>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelFile {
    name: String,
    tile_size: f32,
    rows: Vec<String>,
}

/// Parse a level file. `source` only names the file in error messages.
pub fn parse_level(text: &str, source: &str) -> GameResult<LevelTemplate> {
    let file: LevelFile = serde_json::from_str(text)
        .map_err(|e| GameError::config(format!("{}: {}", source, e)))?;
    if !(file.tile_size.is_finite() && file.tile_size > 0.0) {
        return Err(GameError::config(format!(
            "{}: tile_size must be positive, got {}",
            source, file.tile_size
        )));
    }

    let mut rows = Vec::with_capacity(file.rows.len());
    let mut props = Vec::new();
    let mut start = None;
    for (y, line) in file.rows.iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (x, glyph) in line.chars().enumerate() {
            let coord = GridCoord::new(x as i32, y as i32);
            let ground = Tile::of(TileKind::Ground);
            let tile = match glyph {
                '.' => ground,
                'g' => Tile::of(TileKind::Grass),
                '#' => Tile::of(TileKind::Wall),
                '~' => Tile::of(TileKind::Water),
                'f' => Tile::of(TileKind::Floor),
                'B' => Tile::of(TileKind::Floor).with_interactable(Interactable::Bed),
                '$' => ground.with_interactable(Interactable::Trader),
                'T' | 'L' | '*' => {
                    let kind = match glyph {
                        'T' => PropKind::SmallTree,
                        'L' => PropKind::LargeTree,
                        _ => PropKind::Wildflower,
                    };
                    props.push(PropSpawn { kind, coord });
                    ground.blocking()
                }
                '@' => {
                    if let Some(first) = start.replace(coord) {
                        return Err(GameError::config(format!(
                            "{}: second player start at ({}, {}), first at ({}, {})",
                            source, x, y, first.x, first.y
                        )));
                    }
                    ground
                }
                other => {
                    return Err(GameError::config(format!(
                        "{}: unknown tile '{}' at ({}, {})",
                        source, other, x, y
                    )));
                }
            };
            row.push(tile);
        }
        rows.push(row);
    }

    let start = start.ok_or_else(|| GameError::config(format!("{}: no player start", source)))?;
    let grid = TileWorldGrid::from_rows(rows, file.tile_size).ok_or_else(|| {
        GameError::config(format!("{}: rows must be non-empty and equally long", source))
    })?;
    debug!(
        "Parsed level '{}' {}x{} with {} props",
        file.name,
        grid.width(),
        grid.height(),
        props.len()
    );
    Ok(LevelTemplate {
        name: file.name,
        grid,
        start,
        props,
    })
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    #[serde(default)]
    frames: Option<Vec<String>>,
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    duration: Option<f32>,
    #[serde(default)]
    durations: Option<Vec<f32>>,
    #[serde(default = "default_looped")]
    looped: bool,
}

fn default_looped() -> bool {
    true
}

/// Parse an animation manifest into a store.
///
/// `sequence` resolves `dir` entries to frame ids.
pub fn parse_animation_manifest(
    text: &str,
    source: &str,
    mut sequence: impl FnMut(&str) -> GameResult<Vec<FrameId>>,
) -> GameResult<AnimationStore> {
    let entries: BTreeMap<String, ManifestEntry> = serde_json::from_str(text)
        .map_err(|e| GameError::config(format!("{}: {}", source, e)))?;

    let mut store = AnimationStore::new();
    for (key, entry) in &entries {
        let variants: Vec<Option<Facing>> = if key.contains(DIR_PLACEHOLDER) {
            Facing::ALL.iter().copied().map(Some).collect()
        } else {
            vec![None]
        };
        for facing in variants {
            let subst = |s: &str| match facing {
                Some(f) => s.replace(DIR_PLACEHOLDER, f.name()),
                None => s.to_string(),
            };
            let name = subst(key);
            let frames = match (&entry.frames, &entry.dir) {
                (Some(list), None) => list.iter().map(|f| FrameId::new(subst(f))).collect(),
                (None, Some(dir)) => sequence(&subst(dir))?,
                _ => {
                    return Err(GameError::config(format!(
                        "{}: '{}' needs exactly one of 'frames' or 'dir'",
                        source, name
                    )));
                }
            };
            let durations = match (entry.duration, &entry.durations) {
                (Some(d), None) => FrameDurations::Uniform(d),
                (None, Some(list)) => FrameDurations::PerFrame(list.clone()),
                _ => {
                    return Err(GameError::config(format!(
                        "{}: '{}' needs exactly one of 'duration' or 'durations'",
                        source, name
                    )));
                }
            };
            let timeline = Timeline::new(frames, durations, entry.looped)
                .map_err(|e| GameError::config(format!("{}: '{}': {}", source, name, e)))?;
            store.insert(name, timeline);
        }
    }
    Ok(store)
}

/// Loads from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsAssets { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the sound effect `id` lives.
    pub fn sound_path(&self, id: &str) -> PathBuf {
        self.root.join("audio").join(format!("{}.wav", id))
    }

    /// Where the image for a frame id lives.
    pub fn frame_path(&self, frame: &FrameId) -> PathBuf {
        self.root.join(format!("{}.png", frame.as_str()))
    }

    fn read(&self, path: &str) -> GameResult<String> {
        let full = self.root.join(path);
        fs::read_to_string(&full).map_err(|e| GameError::asset(full, e))
    }
}

impl AssetLoader for FsAssets {
    fn load_image_sequence(&self, path: &str) -> GameResult<Vec<FrameId>> {
        let dir = self.root.join(path);
        let listing = fs::read_dir(&dir).map_err(|e| GameError::asset(&dir, e))?;
        let mut stems: Vec<String> = listing
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        if stems.is_empty() {
            return Err(GameError::asset(dir, "no .png frames"));
        }
        // Numbered frames sort by value so "10" follows "9".
        stems.sort_by(|a, b| match (a.parse::<u32>(), b.parse::<u32>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });
        let base = path.trim_end_matches('/');
        Ok(stems
            .into_iter()
            .map(|stem| FrameId::new(format!("{}/{}", base, stem)))
            .collect())
    }

    fn load_tileset(&self, path: &str) -> GameResult<LevelTemplate> {
        let text = self.read(path)?;
        let level = parse_level(&text, path)?;
        info!(
            "Loaded level '{}' ({}x{}) from {}",
            level.name,
            level.grid.width(),
            level.grid.height(),
            path
        );
        Ok(level)
    }

    fn load_animations(&self, path: &str) -> GameResult<AnimationStore> {
        let text = self.read(path)?;
        let store = parse_animation_manifest(&text, path, |dir| self.load_image_sequence(dir))?;
        info!("Loaded {} animations from {}", store.len(), path);
        Ok(store)
    }
}
