//! Test utilities for integration testing (available with `test-utils` feature).
//!
//! The sample dataset is small but shaped to exercise every report: base model 1 has two
//! customizations and three services with providers out of id order, base model 3 has none, the
//! `health` keyword matches more than five (model, service) pairs, and client 3 has tied usage
//! durations.

use std::path::Path;

use chrono::NaiveDate;
use sqlx::PgConnection;

use crate::db::models::agent_clients::AgentClientCreateDBRequest;
use crate::db::schema;
use crate::import::{ImportSummary, Importer};

pub const SAMPLE_DATASET: &[(&str, &str)] = &[
    (
        "User.csv",
        "uid,email,username
1,alice@example.com,alice
2,bob@example.com,bob
3,carol@example.com,carol
4,dave@example.com,dave
",
    ),
    (
        "AgentCreator.csv",
        "uid,bio,payout
1,Builds language models,NULL
2,NULL,paypal:bob
",
    ),
    (
        "AgentClient.csv",
        "uid,interests,cardholder,expire,cardno,cvv,zip
3,chatbots,Carol Smith,2027-05-31,4111111111111111,123,10001
4,search,Dave Jones,2026-12-31,5500000000000004,456,94105
",
    ),
    (
        "BaseModel.csv",
        "bmid,creator_uid,description
1,1,General chat model
2,1,Code assistant
3,2,Legal summarizer
4,2,Medical QA
5,1,Translation
6,2,Finance analyst
7,1,Support bot
",
    ),
    (
        "CustomizedModel.csv",
        "bmid,mid
1,100
1,101
2,200
4,400
",
    ),
    (
        "Configuration.csv",
        "cid,client_uid,content,labels
10,3,temperature=0.2,prod
11,3,temperature=0.7,staging
12,3,max_tokens=512,dev
13,4,top_p=0.9,prod
",
    ),
    (
        "InternetService.csv",
        "sid,provider,endpoints
1,Zeta Cloud,https://zeta.example.com/v1
2,Acme AI,https://acme.example.com/api
3,Midway Storage,s3://midway
4,Beta Labs,https://beta.example.com
5,Orbit LLM,https://orbit.example.com
",
    ),
    (
        "LLMService.csv",
        "sid,domain
1,healthcare
2,legal healthcare
4,finance
5,NULL
",
    ),
    (
        "DataStorage.csv",
        "sid,type
3,object
",
    ),
    (
        "ModelServices.csv",
        "bmid,sid,version
1,1,1
1,2,3
1,3,1
2,2,1
3,2,2
4,1,1
5,1,2
6,1,1
7,1,4
7,2,1
",
    ),
    (
        "ModelConfigurations.csv",
        "bmid,mid,cid,duration
1,100,10,120
1,101,11,300
2,200,12,45
4,400,10,300
1,100,13,60
",
    ),
];

/// Write `files` (name, contents) into `dir`.
pub fn write_dataset(dir: &Path, files: &[(&str, &str)]) {
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents).expect("Failed to write CSV fixture");
    }
}

/// Create the empty schema.
pub async fn setup_schema(conn: &mut PgConnection) {
    schema::reset(conn).await.expect("Failed to create schema");
}

/// Import [`SAMPLE_DATASET`] through the real importer.
pub async fn load_sample_dataset(conn: &mut PgConnection) -> ImportSummary {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_dataset(dir.path(), SAMPLE_DATASET);
    Importer::new(conn, "NULL")
        .run(dir.path())
        .await
        .expect("Failed to import sample dataset")
}

pub fn client_request(uid: i32) -> AgentClientCreateDBRequest {
    AgentClientCreateDBRequest {
        uid,
        username: format!("client{uid}"),
        email: format!("client{uid}@example.com"),
        card_number: 4111111111111111,
        card_holder: format!("Client {uid}"),
        expiration_date: NaiveDate::from_ymd_opt(2028, 1, 31).expect("valid date"),
        cvv: 321,
        zip: 10001,
        interests: "agents".to_string(),
    }
}
