/// Metadata the saver supplies when it requests a snapshot blob.
///
/// `metric` is present for ranked checkpoint saves and absent for recovery
/// saves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotMeta {
    pub epoch: usize,
    pub metric: Option<f64>,
}

/// Capability interface for the caller-owned training state.
///
/// Implementors bundle whatever they need to resume training (model weights,
/// optimizer state, auxiliary trackers) together with the supplied metadata
/// into a single blob. The saver treats the returned bytes as opaque: it
/// writes, links, and removes whole files and never inspects their contents.
pub trait Snapshot {
    /// Serialize the full training state plus `meta` into one blob.
    fn serialize(&self, meta: &SnapshotMeta) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}
