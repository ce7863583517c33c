use super::*;
use crate::storage::{Database, Schema};
use rusqlite::params;
use serde_json::json;

fn log() -> (ActivityLog, Database) {
    let db = Database::open_in_memory(Schema::Admin).unwrap();
    (ActivityLog::new(db.clone()), db)
}

async fn insert_at(db: &Database, kind: &'static str, timestamp: &'static str) {
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO activities (user_id, user_name, activity_type, details, timestamp)
             VALUES (1, 'Anna', ?1, NULL, ?2)",
            params![kind, timestamp],
        )?;
        Ok(())
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_record_and_read_back_details() {
    let (log, _) = log();
    log.record(
        Some(7),
        "Anna",
        ActivityKind::ChatbotQuery,
        Some(json!({"query": "group work?", "response_length": 120})),
    )
    .await;
    log.record(None, "Unknown", ActivityKind::Login, None).await;

    let conversations = log.conversations().await.unwrap();
    assert_eq!(conversations.len(), 1);
    let entry = &conversations[0];
    assert_eq!(entry.user_id, Some(7));
    assert_eq!(entry.user_name.as_deref(), Some("Anna"));
    assert_eq!(entry.activity_type, "chatbot_query");
    assert_eq!(entry.details.as_ref().unwrap()["response_length"], 120);

    let dashboard = log.dashboard().await.unwrap();
    let login = dashboard
        .recent_activities
        .iter()
        .find(|a| a.activity_type == "login")
        .unwrap();
    assert!(login.details.is_none());
    assert!(login.user_id.is_none());
}

#[tokio::test]
async fn test_record_never_fails_to_caller() {
    let (log, db) = log();
    db.call(|conn| {
        conn.execute_batch("DROP TABLE activities;")?;
        Ok(())
    })
    .await
    .unwrap();

    log.record(Some(1), "Anna", ActivityKind::Logout, None).await;
    assert!(log.dashboard().await.is_err());
}

#[tokio::test]
async fn test_dashboard_aggregates() {
    let (log, db) = log();
    insert_at(&db, "login", "2026-03-01 08:00:00").await;
    insert_at(&db, "chatbot_query", "2026-03-01 09:00:00").await;
    insert_at(&db, "chatbot_query", "2026-03-02 10:00:00").await;
    insert_at(&db, "get_suggestions", "2026-03-03 11:00:00").await;
    insert_at(&db, "page_view", "2026-03-03 12:00:00").await;

    let dashboard = log.dashboard().await.unwrap();

    assert_eq!(
        dashboard.conversation_stats,
        vec![
            TypeCount {
                activity_type: "chatbot_query".to_string(),
                count: 2
            },
            TypeCount {
                activity_type: "get_suggestions".to_string(),
                count: 1
            },
        ]
    );
    assert_eq!(dashboard.activity_stats.len(), 4);
    assert_eq!(dashboard.recent_activities.len(), 5);
    assert_eq!(dashboard.recent_activities[0].activity_type, "page_view");
    assert_eq!(
        dashboard.daily_activities,
        vec![
            DailyCount {
                day: "2026-03-03".to_string(),
                count: 2
            },
            DailyCount {
                day: "2026-03-02".to_string(),
                count: 1
            },
            DailyCount {
                day: "2026-03-01".to_string(),
                count: 2
            },
        ]
    );
}

#[tokio::test]
async fn test_dashboard_limits() {
    let (log, db) = log();
    let days = [
        "2026-01-01 10:00:00",
        "2026-01-02 10:00:00",
        "2026-01-03 10:00:00",
        "2026-01-04 10:00:00",
        "2026-01-05 10:00:00",
        "2026-01-06 10:00:00",
        "2026-01-07 10:00:00",
        "2026-01-08 10:00:00",
        "2026-01-09 10:00:00",
    ];
    for day in days {
        for _ in 0..3 {
            insert_at(&db, "page_view", day).await;
        }
    }

    let dashboard = log.dashboard().await.unwrap();
    assert_eq!(dashboard.recent_activities.len(), 20);
    assert_eq!(dashboard.daily_activities.len(), 7);
    assert_eq!(dashboard.daily_activities[0].day, "2026-01-09");
    assert_eq!(dashboard.daily_activities[6].day, "2026-01-03");
}

#[test]
fn test_kind_names() {
    assert_eq!(ActivityKind::ViewObservationDetails.as_str(), "view_observation_details");
    assert_eq!(
        serde_json::to_value(ActivityKind::SearchObservations).unwrap(),
        "search_observations"
    );
    assert_eq!(ActivityKind::PageView.to_string(), "page_view");
}
