use thiserror::Error;

use tc_behavior::BehaviorError;
use tc_core::CoreError;
use tc_save::SaveError;
use tc_world::WorldError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("save error: {0}")]
    Save(#[from] SaveError),

    #[error("game loop task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("game loop has stopped")]
    Stopped,
}

pub type SimResult<T> = Result<T, SimError>;
