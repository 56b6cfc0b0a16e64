use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

const FEEDBACK_COLUMNS: &str =
    "id, user_id, version, type, data, meta, snapshot, created_at, updated_at";

pub fn insert_feedback(conn: &Connection, feedback: &Feedback) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO feedback (id, user_id, version, type, data, meta, snapshot, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            feedback.id.to_string(),
            feedback.user_id,
            feedback.version,
            feedback.feedback_type,
            to_json_column(&feedback.data)?,
            to_json_column(&feedback.meta)?,
            to_json_column(&feedback.snapshot)?,
            feedback.created_at,
            feedback.updated_at,
        ],
    )?;
    Ok(())
}

/// Fetch one record. With `owner` set, a record belonging to another user
/// is reported as absent.
pub fn get_feedback(
    conn: &Connection,
    id: &Uuid,
    owner: Option<&str>,
) -> Result<Option<Feedback>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {FEEDBACK_COLUMNS} FROM feedback
                 WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)"
            ),
            params![id.to_string(), owner],
            read_row,
        )
        .optional()?;

    row.map(feedback_from_row).transpose()
}

/// Newest first by `updated_at`.
pub fn list_feedbacks(
    conn: &Connection,
    filter: &FeedbackFilter,
) -> Result<Vec<Feedback>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback
         WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR type = ?2)
         ORDER BY updated_at DESC, created_at DESC, id ASC"
    ))?;

    let rows = stmt.query_map(
        params![filter.user_id, filter.feedback_type],
        read_row,
    )?;

    let mut feedbacks = Vec::new();
    for row in rows {
        feedbacks.push(feedback_from_row(row?)?);
    }
    Ok(feedbacks)
}

/// Write back the mutable columns (`data`, `meta`, `snapshot`, `updated_at`).
/// Returns false when no row has this id.
pub fn update_feedback(conn: &Connection, feedback: &Feedback) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE feedback SET data = ?1, meta = ?2, snapshot = ?3, updated_at = ?4
         WHERE id = ?5",
        params![
            to_json_column(&feedback.data)?,
            to_json_column(&feedback.meta)?,
            to_json_column(&feedback.snapshot)?,
            feedback.updated_at,
            feedback.id.to_string(),
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete_feedback(
    conn: &Connection,
    id: &Uuid,
    owner: Option<&str>,
) -> Result<bool, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM feedback WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)",
        params![id.to_string(), owner],
    )?;
    Ok(deleted > 0)
}

/// Delete every record, or every record of one user. Returns the row count.
pub fn delete_feedbacks(conn: &Connection, owner: Option<&str>) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM feedback WHERE (?1 IS NULL OR user_id = ?1)",
        params![owner],
    )?;
    Ok(deleted)
}

pub fn count_feedbacks(conn: &Connection, owner: Option<&str>) -> Result<usize, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM feedback WHERE (?1 IS NULL OR user_id = ?1)",
        params![owner],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count as usize)
}

struct FeedbackRow {
    id: String,
    user_id: String,
    version: i64,
    feedback_type: String,
    data: Option<String>,
    meta: Option<String>,
    snapshot: Option<String>,
    created_at: i64,
    updated_at: i64,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedbackRow> {
    Ok(FeedbackRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        version: row.get(2)?,
        feedback_type: row.get(3)?,
        data: row.get(4)?,
        meta: row.get(5)?,
        snapshot: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn feedback_from_row(row: FeedbackRow) -> Result<Feedback, DatabaseError> {
    Ok(Feedback {
        id: Uuid::parse_str(&row.id).map_err(|_| DatabaseError::InvalidId {
            column: "feedback.id".into(),
            value: row.id.clone(),
        })?,
        user_id: row.user_id,
        version: row.version,
        feedback_type: row.feedback_type,
        data: from_json_column(row.data.as_deref())?,
        meta: from_json_column(row.meta.as_deref())?,
        snapshot: from_json_column(row.snapshot.as_deref())?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_json_column<T: Serialize>(value: &Option<T>) -> Result<Option<String>, DatabaseError> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(DatabaseError::from)
}

fn from_json_column<T: DeserializeOwned>(raw: Option<&str>) -> Result<Option<T>, DatabaseError> {
    match raw {
        None | Some("null") => Ok(None),
        Some(text) => Ok(Some(serde_json::from_str(text)?)),
    }
}
