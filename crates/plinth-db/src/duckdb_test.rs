use super::*;
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert!(db.relation_exists(OPTIONS_TABLE).await.unwrap());
}

#[tokio::test]
async fn test_execute_and_relation_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE events (id INTEGER)").await.unwrap();
    let inserted = db
        .execute("INSERT INTO events VALUES (1), (2)")
        .await
        .unwrap();

    assert_eq!(inserted, 2);
    assert!(db.relation_exists("events").await.unwrap());
    assert!(db.relation_exists("main.events").await.unwrap());
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_execute_error_includes_sql() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute("INSERT INTO missing VALUES (1)").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("[D002]"));
    assert!(msg.contains("INSERT INTO missing VALUES (1)"));
}

#[tokio::test]
async fn test_option_roundtrip_and_overwrite() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.get_option("completed").await.unwrap(), None);

    db.update_option("completed", &json!(["/a.sql"])).await.unwrap();
    db.update_option("completed", &json!(["/a.sql", "/b.sql"]))
        .await
        .unwrap();

    assert_eq!(
        db.get_option("completed").await.unwrap(),
        Some(json!(["/a.sql", "/b.sql"]))
    );
}

#[tokio::test]
async fn test_delete_option() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.update_option("flag", &json!("running")).await.unwrap();

    assert!(db.delete_option("flag").await.unwrap());
    assert!(!db.delete_option("flag").await.unwrap());
    assert_eq!(db.get_option("flag").await.unwrap(), None);
}

#[tokio::test]
async fn test_compare_and_set() {
    let db = DuckDbBackend::in_memory().unwrap();

    assert!(db.compare_and_set("flag", None, &json!("running")).await.unwrap());
    // Already present: an "only if absent" swap must fail
    assert!(!db.compare_and_set("flag", None, &json!("running")).await.unwrap());
    assert!(!db
        .compare_and_set("flag", Some(&json!("idle")), &json!("other"))
        .await
        .unwrap());
    assert!(db
        .compare_and_set("flag", Some(&json!("running")), &json!("done"))
        .await
        .unwrap());
    assert_eq!(db.get_option("flag").await.unwrap(), Some(json!("done")));
}

#[tokio::test]
async fn test_options_persist_across_connections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("site.duckdb");

    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.update_option("active_plugins", &json!(["forms/forms.php"]))
            .await
            .unwrap();
    }

    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    assert_eq!(
        db.get_option("active_plugins").await.unwrap(),
        Some(json!(["forms/forms.php"]))
    );
}

#[tokio::test]
async fn test_malformed_option_value() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("INSERT INTO plinth_options VALUES ('broken', 'not json')")
        .await
        .unwrap();

    let err = db.get_option("broken").await.unwrap_err();
    assert!(matches!(err, DbError::OptionDecode { .. }));
}
