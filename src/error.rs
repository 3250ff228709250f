//! Error type shared by every generation pass.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = DungeonError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DungeonError {
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Room tiles must be carved through a room so they carry an owner.
    #[error("tile ({x}, {y}) cannot become a room tile without an owning room")]
    RoomKindRequiresOwner { x: i32, y: i32 },

    #[error("i/o error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("could not write debug image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
