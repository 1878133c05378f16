pub mod memory;

pub use memory::MemStore;

/// Acknowledgment for update-style operations, mirroring the matched /
/// modified counts a document store reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub matched_count: u64,
    pub modified_count: u64,
}
