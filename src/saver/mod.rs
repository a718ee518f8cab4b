mod engine;
mod fsops;
mod ordering;
mod state;

pub use engine::{BestCheckpoint, CheckpointSaver};
pub use ordering::MetricOrdering;
pub use state::{RankedCheckpoint, SaverState, STATE_FILE_NAME};
