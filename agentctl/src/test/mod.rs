//! End-to-end command journeys against a real database.

use sqlx::{PgConnection, PgPool};

use crate::cli::Command;
use crate::commands::{report, run};
use crate::config::Config;
use crate::test_utils::{SAMPLE_DATASET, write_dataset};

struct Session {
    config: Config,
    succeeded: bool,
}

impl Session {
    fn new() -> Self {
        Self {
            config: Config::default(),
            succeeded: true,
        }
    }

    /// Run one command line the way the binary does and return what it printed.
    async fn invoke(&mut self, conn: &mut PgConnection, line: &[&str]) -> String {
        let command = Command::parse(line).expect("valid command line");
        let mut out = Vec::new();
        let result = run(&command, conn, &self.config, &mut out).await;
        self.succeeded = report(&command, &result, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }
}

/// Import, mutate, query, and re-import to restore the dataset.
#[sqlx::test]
#[test_log::test]
async fn test_marketplace_journey(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let mut session = Session::new();

    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), SAMPLE_DATASET);
    let folder = dir.path().to_str().unwrap();

    assert_eq!(session.invoke(&mut conn, &["import", folder]).await, "Success\n");
    assert!(session.succeeded);

    // uid 1 already belongs to a creator
    let taken = [
        "insertAgentClient",
        "1",
        "mallory",
        "mallory@example.com",
        "4000000000000010",
        "Mallory",
        "2030-01-31",
        "111",
        "20001",
        "none",
    ];
    assert_eq!(session.invoke(&mut conn, &taken).await, "Fail\n");
    assert!(!session.succeeded);

    assert_eq!(session.invoke(&mut conn, &["addCustomizedModel", "500", "3"]).await, "Success\n");
    assert_eq!(
        session.invoke(&mut conn, &["countCustomizedModel", "3"]).await,
        "3,Legal summarizer,1\n"
    );

    assert_eq!(session.invoke(&mut conn, &["deleteBaseModel", "1"]).await, "Success\n");
    assert_eq!(session.invoke(&mut conn, &["listInternetService", "1"]).await, "");
    assert!(session.succeeded);

    assert_eq!(
        session.invoke(&mut conn, &["topNDurationConfig", "3", "100"]).await,
        "3,10,prod,temperature=0.2,300\n3,12,dev,max_tokens=512,45\n"
    );

    let matches = session.invoke(&mut conn, &["listBaseModelKeyWord", "health"]).await;
    assert_eq!(
        matches,
        "2,2,Acme AI,legal healthcare\n\
         3,2,Acme AI,legal healthcare\n\
         4,1,Zeta Cloud,healthcare\n\
         5,1,Zeta Cloud,healthcare\n\
         6,1,Zeta Cloud,healthcare\n"
    );

    // a fresh import replaces everything, including the deletion above
    assert_eq!(session.invoke(&mut conn, &["import", folder]).await, "Success\n");
    assert_eq!(
        session.invoke(&mut conn, &["countCustomizedModel", "1", "3"]).await,
        "1,General chat model,2\n3,Legal summarizer,0\n"
    );
}

/// A failed import leaves the previous dataset untouched.
#[sqlx::test]
#[test_log::test]
async fn test_failed_import_keeps_previous_dataset(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let mut session = Session::new();

    let good = tempfile::tempdir().unwrap();
    write_dataset(good.path(), SAMPLE_DATASET);
    assert_eq!(
        session.invoke(&mut conn, &["import", good.path().to_str().unwrap()]).await,
        "Success\n"
    );

    let bad = tempfile::tempdir().unwrap();
    write_dataset(
        bad.path(),
        &[
            ("User.csv", "uid,email,username\n1,x@example.com,x\n"),
            ("BaseModel.csv", "bmid,creator_uid,description\n1,1,orphan\n"),
        ],
    );
    assert_eq!(
        session.invoke(&mut conn, &["import", bad.path().to_str().unwrap()]).await,
        "Fail\n"
    );
    assert!(!session.succeeded);

    assert_eq!(
        session.invoke(&mut conn, &["countCustomizedModel", "1", "2"]).await,
        "1,General chat model,2\n2,Code assistant,1\n"
    );
}

/// Query commands on a database without the schema print nothing and fail.
#[sqlx::test]
#[test_log::test]
async fn test_queries_before_import_fail_silently(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let mut session = Session::new();

    assert_eq!(session.invoke(&mut conn, &["listInternetService", "1"]).await, "");
    assert!(!session.succeeded);
    assert_eq!(session.invoke(&mut conn, &["deleteBaseModel", "1"]).await, "Fail\n");
}
