use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One embedded piece of conversation memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryChunk {
    pub id: Uuid,
    pub collection: String,
    pub content: String,
    pub embedding: Vec<f32>,
    pub chunk_index: usize,
    pub metadata: Map<String, Value>,
    pub created_at: i64,
}
