//! Dodge the falling blocks, in your terminal.

pub mod advice;
pub mod app;
pub mod config;
pub mod consts;
pub mod error;
pub mod geom;
pub mod highscore;
pub mod input;
pub mod obstacles;
pub mod player;
pub mod render;
pub mod run;
#[cfg(feature = "sound")]
pub mod sound;
pub mod text;

pub use app::{App, Screen, Step};
pub use config::Config;
pub use error::{Error, Result};
