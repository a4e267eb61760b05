//! End-to-end migration runs against a real DuckDB database

use plinth_core::{ExecutionContext, RepoName, SplitMode};
use plinth_db::{Database, DuckDbBackend, OptionStore};
use plinth_migrate::{
    guard, CompletedSet, MigrationRunner, Repo, RunOutcome, SchemaManager,
    COMPLETED_MIGRATIONS_OPTION,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn content_with(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let content = TempDir::new().unwrap();
    let dir = content.path().join("acme").join("migrations");
    fs::create_dir_all(&dir).unwrap();
    for (name, sql) in files {
        fs::write(dir.join(name), sql).unwrap();
    }
    (content, dir)
}

#[tokio::test]
async fn test_migrations_apply_against_duckdb() {
    let (content, dir) = content_with(&[
        ("001-a.sql", "CREATE TABLE events (id INTEGER, title VARCHAR);\n"),
        (
            "002-b.sql",
            "INSERT INTO events VALUES (1, 'launch');\nINSERT INTO nope VALUES (1);\n",
        ),
    ]);
    let db = DuckDbBackend::in_memory().unwrap();
    let runner = MigrationRunner::new(&db, &db, content.path());
    let repo = RepoName::new("acme");

    let outcome = runner.run(&repo, &dir).await.unwrap();

    let RunOutcome::Applied(report) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    assert_eq!(report.statements_executed(), 2);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.files[1].failures[0].statement, "INSERT INTO nope VALUES (1)");

    assert!(db.relation_exists("events").await.unwrap());
    let completed = CompletedSet::load(&db).await.unwrap();
    assert_eq!(completed.len(), 2);
    assert_eq!(db.get_option(&guard::running_flag_option(&repo)).await.unwrap(), None);

    assert_eq!(runner.run(&repo, &dir).await.unwrap(), RunOutcome::UpToDate);
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let (content, dir) = content_with(&[("001-a.sql", "CREATE TABLE events (id INTEGER);\n")]);
    let db_path = content.path().join("state.duckdb");
    let repo = RepoName::new("acme");

    {
        let db = DuckDbBackend::from_path(&db_path).unwrap();
        let runner = MigrationRunner::new(&db, &db, content.path());
        assert!(matches!(
            runner.run(&repo, &dir).await.unwrap(),
            RunOutcome::Applied(_)
        ));
    }

    let db = DuckDbBackend::from_path(&db_path).unwrap();
    assert_eq!(
        db.get_option(COMPLETED_MIGRATIONS_OPTION).await.unwrap(),
        Some(json!(["/acme/migrations/001-a.sql"]))
    );
    let runner = MigrationRunner::new(&db, &db, content.path());
    assert_eq!(runner.run(&repo, &dir).await.unwrap(), RunOutcome::UpToDate);
}

#[tokio::test]
async fn test_stuck_flag_blocks_until_unlocked() {
    let (content, dir) = content_with(&[("001-a.sql", "CREATE TABLE events (id INTEGER);\n")]);
    let db = DuckDbBackend::in_memory().unwrap();
    let repo = RepoName::new("acme");
    db.update_option(&guard::running_flag_option(&repo), &json!("running"))
        .await
        .unwrap();
    let runner = MigrationRunner::new(&db, &db, content.path());

    assert_eq!(runner.run(&repo, &dir).await.unwrap(), RunOutcome::AlreadyRunning);
    assert!(!db.relation_exists("events").await.unwrap());

    assert!(runner.unlock(&repo).await.unwrap());
    assert!(matches!(
        runner.run(&repo, &dir).await.unwrap(),
        RunOutcome::Applied(_)
    ));
    assert!(db.relation_exists("events").await.unwrap());
}

#[tokio::test]
async fn test_quote_aware_inserts_literal_with_semicolon_newline() {
    let (content, dir) = content_with(&[(
        "001-a.sql",
        "CREATE TABLE notes (body VARCHAR);\nINSERT INTO notes VALUES ('a;\nb');\n",
    )]);
    let db = DuckDbBackend::in_memory().unwrap();
    let runner =
        MigrationRunner::new(&db, &db, content.path()).with_split_mode(SplitMode::QuoteAware);

    let outcome = runner.run(&RepoName::new("acme"), &dir).await.unwrap();

    let RunOutcome::Applied(report) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    assert_eq!(report.failure_count(), 0);
    assert_eq!(report.statements_executed(), 2);
}

#[tokio::test]
async fn test_boot_and_schema_against_duckdb() {
    let content = TempDir::new().unwrap();
    let repo_dir = content.path().join("acme");
    fs::create_dir_all(repo_dir.join("migrations")).unwrap();
    fs::write(
        repo_dir.join("plinth.yml"),
        "name: acme\nschema:\n  tables:\n    - name: acme_events\n      columns:\n        - id INTEGER\n",
    )
    .unwrap();
    fs::write(
        repo_dir.join("migrations").join("001-seed.sql"),
        "INSERT INTO wp_acme_events VALUES (1);\n",
    )
    .unwrap();
    let config = plinth_core::Config::load_from_dir(&repo_dir).unwrap();
    let db = DuckDbBackend::in_memory().unwrap();

    let schema = SchemaManager::new(&config.schema);
    assert_eq!(schema.missing_tables(&db).await.unwrap(), vec!["wp_acme_events"]);
    schema.create_tables(&db).await.unwrap();
    schema.create_tables(&db).await.unwrap();
    assert!(schema.missing_tables(&db).await.unwrap().is_empty());

    let repo = Repo::boot(&config, &repo_dir, ExecutionContext::interactive(), &db, &db)
        .await
        .unwrap();
    let Some(RunOutcome::Applied(report)) = repo.migrations else {
        panic!("expected migrations to apply");
    };
    assert_eq!(report.failure_count(), 0);

    schema.drop_tables(&db).await.unwrap();
    assert_eq!(schema.missing_tables(&db).await.unwrap(), vec!["wp_acme_events"]);
}
