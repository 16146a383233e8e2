//! The `SaveCodec` trait and the JSON implementation.

use crate::{SaveResult, SavedGame};

/// Turns a [`SavedGame`] into bytes and back.
pub trait SaveCodec {
    /// File extension used for saves written by this codec.
    fn extension(&self) -> &'static str;

    fn encode(&self, game: &SavedGame) -> SaveResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> SaveResult<SavedGame>;
}

/// `serde_json` codec.  Compact unless built with [`JsonCodec::pretty`].
#[derive(Copy, Clone, Debug, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SaveCodec for JsonCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, game: &SavedGame) -> SaveResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(game)?
        } else {
            serde_json::to_vec(game)?
        };
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> SaveResult<SavedGame> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
