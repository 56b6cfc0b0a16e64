//! Repository layer — entity-scoped database operations.
//!
//! Functions take a plain `&Connection` so they compose inside a caller's
//! transaction (`&Transaction` derefs to `&Connection`).

mod feedback;
mod memory_chunk;

pub use feedback::*;
pub use memory_chunk::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::*;
    use rusqlite::Connection;
    use serde_json::json;
    use uuid::Uuid;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_feedback(conn: &Connection, user_id: &str, feedback_type: &str, updated_at: i64) -> Uuid {
        let id = Uuid::new_v4();
        insert_feedback(conn, &Feedback {
            id,
            user_id: user_id.into(),
            version: 0,
            feedback_type: feedback_type.into(),
            data: Some(RatingData {
                rating: Some(Rating::Number(1)),
                model_id: Some("m1".into()),
                ..Default::default()
            }),
            meta: Some(MetaData {
                message_id: Some("msg2".into()),
                ..Default::default()
            }),
            snapshot: None,
            created_at: updated_at,
            updated_at,
        }).unwrap();
        id
    }

    #[test]
    fn feedback_insert_and_retrieve() {
        let conn = test_db();
        let id = make_feedback(&conn, "u1", "rating", 100);
        let fb = get_feedback(&conn, &id, None).unwrap().unwrap();
        assert_eq!(fb.user_id, "u1");
        assert_eq!(fb.feedback_type, "rating");
        assert_eq!(fb.version, 0);
        assert_eq!(fb.data.unwrap().model_id.as_deref(), Some("m1"));
        assert_eq!(fb.meta.unwrap().message_id.as_deref(), Some("msg2"));
        assert!(fb.snapshot.is_none());
    }

    #[test]
    fn feedback_missing_id_is_none() {
        let conn = test_db();
        assert!(get_feedback(&conn, &Uuid::new_v4(), None).unwrap().is_none());
    }

    #[test]
    fn feedback_owner_scope_hides_foreign_records() {
        let conn = test_db();
        let id = make_feedback(&conn, "u1", "rating", 100);
        assert!(get_feedback(&conn, &id, Some("u1")).unwrap().is_some());
        assert!(get_feedback(&conn, &id, Some("u2")).unwrap().is_none());
    }

    #[test]
    fn feedback_list_newest_first_with_filters() {
        let conn = test_db();
        let old = make_feedback(&conn, "u1", "rating", 100);
        let new = make_feedback(&conn, "u2", "rating", 300);
        let mid = make_feedback(&conn, "u1", "comment", 200);

        let all: Vec<Uuid> = list_feedbacks(&conn, &FeedbackFilter::all())
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(all, vec![new, mid, old]);

        let by_user: Vec<Uuid> = list_feedbacks(&conn, &FeedbackFilter::by_user("u1"))
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(by_user, vec![mid, old]);

        let by_type: Vec<Uuid> = list_feedbacks(&conn, &FeedbackFilter::by_type("rating"))
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(by_type, vec![new, old]);
    }

    #[test]
    fn feedback_update_writes_payloads_and_timestamp() {
        let conn = test_db();
        let id = make_feedback(&conn, "u1", "rating", 100);
        let mut fb = get_feedback(&conn, &id, None).unwrap().unwrap();
        fb.meta = None;
        fb.snapshot = Some(SnapshotData {
            chat: Some(json!({"id": "c1"})),
            ..Default::default()
        });
        fb.updated_at = 150;
        assert!(update_feedback(&conn, &fb).unwrap());

        let stored = get_feedback(&conn, &id, None).unwrap().unwrap();
        assert!(stored.meta.is_none());
        assert_eq!(stored.snapshot.unwrap().chat, Some(json!({"id": "c1"})));
        assert_eq!(stored.updated_at, 150);
        assert_eq!(stored.created_at, 100);
    }

    #[test]
    fn feedback_update_unknown_id_reports_false() {
        let conn = test_db();
        let fb = Feedback {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            version: 0,
            feedback_type: "rating".into(),
            data: None,
            meta: None,
            snapshot: None,
            created_at: 1,
            updated_at: 1,
        };
        assert!(!update_feedback(&conn, &fb).unwrap());
    }

    #[test]
    fn feedback_delete_respects_owner() {
        let conn = test_db();
        let id = make_feedback(&conn, "u1", "rating", 100);
        assert!(!delete_feedback(&conn, &id, Some("u2")).unwrap());
        assert!(delete_feedback(&conn, &id, Some("u1")).unwrap());
        assert!(!delete_feedback(&conn, &id, None).unwrap());
    }

    #[test]
    fn feedback_bulk_delete_and_count() {
        let conn = test_db();
        make_feedback(&conn, "u1", "rating", 100);
        make_feedback(&conn, "u1", "rating", 110);
        make_feedback(&conn, "u2", "rating", 120);

        assert_eq!(count_feedbacks(&conn, None).unwrap(), 3);
        assert_eq!(delete_feedbacks(&conn, Some("u1")).unwrap(), 2);
        assert_eq!(count_feedbacks(&conn, Some("u1")).unwrap(), 0);
        assert_eq!(delete_feedbacks(&conn, None).unwrap(), 1);
        assert_eq!(count_feedbacks(&conn, None).unwrap(), 0);
    }

    #[test]
    fn memory_chunk_insert_list_delete() {
        let conn = test_db();
        for i in 0..3 {
            insert_memory_chunk(&conn, &MemoryChunk {
                id: Uuid::new_v4(),
                collection: "conversation_memory_u1".into(),
                content: format!("chunk {i}"),
                embedding: vec![0.5, 0.25],
                chunk_index: i,
                metadata: json!({"source": "feedback"}).as_object().unwrap().clone(),
                created_at: 10,
            }).unwrap();
        }

        let chunks = get_memory_chunks(&conn, "conversation_memory_u1").unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "chunk 0");
        assert_eq!(chunks[2].embedding, vec![0.5, 0.25]);
        assert_eq!(chunks[1].metadata["source"], "feedback");

        assert_eq!(count_memory_chunks(&conn, "conversation_memory_u2").unwrap(), 0);
        assert_eq!(delete_memory_chunks(&conn, "conversation_memory_u1").unwrap(), 3);
        assert_eq!(count_memory_chunks(&conn, "conversation_memory_u1").unwrap(), 0);
    }
}
