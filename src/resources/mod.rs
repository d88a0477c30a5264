//! Long-lived data: ECS resources of the level world and the services the
//! screens share.
//!
//! Overview
//! - `animationstore` – frame timelines keyed by animation name
//! - `assets` – asset loading from disk, level and manifest parsing
//! - `audio` – bridge and handle for the background audio thread
//! - `daycycle` – sky tint over the day and the sleep fade
//! - `debugmode` – presence turns on debug overlays
//! - `gameconfig` – INI configuration
//! - `gamecontext` – state shared across screens and saved to disk
//! - `input` – per-tick logical button snapshot
//! - `inventory` – items, hotbar selection and the trader's prices
//! - `persistence` – save store
//! - `renderframe` – draw list handed to the frontend
//! - `tilegrid` – the level's tile grid
//! - `weather` – rain and the level's random source
//! - `worldtime` – simulation time and delta
pub mod animationstore;
pub mod assets;
pub mod audio;
pub mod daycycle;
pub mod debugmode;
pub mod gameconfig;
pub mod gamecontext;
pub mod input;
pub mod inventory;
pub mod persistence;
pub mod renderframe;
pub mod tilegrid;
pub mod weather;
pub mod worldtime;
