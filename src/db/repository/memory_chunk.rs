use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::MemoryChunk;

pub fn insert_memory_chunk(conn: &Connection, chunk: &MemoryChunk) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO memory_chunks (id, collection, content, embedding, chunk_index, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            chunk.id.to_string(),
            chunk.collection,
            chunk.content,
            encode_embedding(&chunk.embedding),
            chunk.chunk_index as i64,
            serde_json::to_string(&chunk.metadata)?,
            chunk.created_at,
        ],
    )?;
    Ok(())
}

/// All chunks of a collection in insertion order.
pub fn get_memory_chunks(
    conn: &Connection,
    collection: &str,
) -> Result<Vec<MemoryChunk>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, collection, content, embedding, chunk_index, metadata, created_at
         FROM memory_chunks WHERE collection = ?1
         ORDER BY created_at ASC, rowid ASC",
    )?;

    let rows = stmt.query_map(params![collection], |row| {
        Ok(MemoryChunkRow {
            id: row.get(0)?,
            collection: row.get(1)?,
            content: row.get(2)?,
            embedding: row.get(3)?,
            chunk_index: row.get(4)?,
            metadata: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;

    let mut chunks = Vec::new();
    for row in rows {
        chunks.push(memory_chunk_from_row(row?)?);
    }
    Ok(chunks)
}

pub fn count_memory_chunks(conn: &Connection, collection: &str) -> Result<usize, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM memory_chunks WHERE collection = ?1",
        params![collection],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count as usize)
}

pub fn delete_memory_chunks(conn: &Connection, collection: &str) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM memory_chunks WHERE collection = ?1",
        params![collection],
    )?;
    Ok(deleted)
}

struct MemoryChunkRow {
    id: String,
    collection: String,
    content: String,
    embedding: Vec<u8>,
    chunk_index: i64,
    metadata: String,
    created_at: i64,
}

fn memory_chunk_from_row(row: MemoryChunkRow) -> Result<MemoryChunk, DatabaseError> {
    Ok(MemoryChunk {
        id: Uuid::parse_str(&row.id).map_err(|_| DatabaseError::InvalidId {
            column: "memory_chunks.id".into(),
            value: row.id.clone(),
        })?,
        collection: row.collection,
        content: row.content,
        embedding: decode_embedding(&row.embedding),
        chunk_index: row.chunk_index as usize,
        metadata: serde_json::from_str(&row.metadata)?,
        created_at: row.created_at,
    })
}

/// Little-endian f32s, 4 bytes each.
fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_blob_round_trip() {
        let original = vec![0.25f32, -1.5, 3.0];
        let bytes = encode_embedding(&original);
        assert_eq!(bytes.len(), 12);
        assert_eq!(decode_embedding(&bytes), original);
    }
}
