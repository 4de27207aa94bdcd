//! Command execution.
//!
//! Each command is one unit of work: open the connection, run the statements, print the result.
//! Mutations print a single `Success` or `Fail` line. Queries print one comma-joined line per row
//! and nothing at all when they fail; rows are fetched completely before anything is written, so
//! a failing query never leaves partial output behind.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use sqlx::PgConnection;
use tracing::{info, instrument};

use crate::cli::Command;
use crate::config::{Args, Config};
use crate::db;
use crate::db::handlers::{AgentClients, BaseModels, Configurations, CustomizedModels, InternetServices, Repository};
use crate::errors::{Error, Result};
use crate::import::Importer;

/// One full invocation: parse the command line, load the configuration, execute, report.
///
/// Usage errors are printed before the configuration is read. A configuration that fails to load
/// is reported like any other failure of the command, so mutations still print `Fail`.
pub async fn invoke<W: Write>(args: &Args, out: &mut W) -> std::io::Result<bool> {
    let command = match Command::parse(&args.command) {
        Ok(command) => command,
        Err(usage) => {
            writeln!(out, "{usage}")?;
            return Ok(false);
        }
    };

    let result = match Config::load(args) {
        Ok(config) => execute(&command, &config, out).await,
        Err(e) => Err(Error::from(e)),
    };

    report(&command, &result, out)
}

/// Run `command` against the configured database (or file), writing rows to `out`.
#[instrument(skip_all, fields(command = %command))]
pub async fn execute<W: Write>(command: &Command, config: &Config, out: &mut W) -> Result<()> {
    if !command.uses_database() {
        return print_results_file(&config.results_file, out);
    }

    let mut conn = db::connect(&config.database).await?;
    run(command, &mut conn, config, out).await
}

/// Run a database command on an already open connection.
pub async fn run<W: Write>(command: &Command, conn: &mut PgConnection, config: &Config, out: &mut W) -> Result<()> {
    match command {
        Command::Import { folder } => {
            let summary = Importer::new(conn, config.import.null_token.as_str()).run(folder).await?;
            info!(tables = summary.tables.len(), rows = summary.total_rows(), "imported");
        }
        Command::InsertAgentClient(request) => {
            AgentClients::new(conn).create(request).await?;
        }
        Command::AddCustomizedModel(id) => {
            CustomizedModels::new(conn).create(id).await?;
        }
        Command::DeleteBaseModel { bmid } => {
            if !BaseModels::new(conn).delete(*bmid).await? {
                info!(bmid, "no such base model, nothing deleted");
            }
        }
        Command::ListInternetService { bmid } => {
            let services = InternetServices::new(conn).list_for_base_model(*bmid).await?;
            write_rows(out, &services)?;
        }
        Command::CountCustomizedModel { bmids } => {
            let counts = BaseModels::new(conn).count_customizations(bmids).await?;
            write_rows(out, &counts)?;
        }
        Command::TopNDurationConfig { uid, n } => {
            let rows = Configurations::new(conn).top_by_duration(*uid, *n).await?;
            write_rows(out, &rows)?;
        }
        Command::ListBaseModelKeyWord { keyword } => {
            let matches = BaseModels::new(conn).search_by_llm_domain(keyword).await?;
            write_rows(out, &matches)?;
        }
        Command::PrintNl2SqlResult => return print_results_file(&config.results_file, out),
    }

    Ok(())
}

/// Print the outcome line(s) for a finished command and return whether it succeeded.
pub fn report<W: Write>(command: &Command, result: &Result<()>, out: &mut W) -> std::io::Result<bool> {
    match result {
        Ok(()) => {
            if command.is_mutation() {
                writeln!(out, "Success")?;
            }
            Ok(true)
        }
        Err(err) => {
            err.log(command.name());
            if let Some(message) = err.user_message() {
                writeln!(out, "{message}")?;
            } else if command.is_mutation() {
                writeln!(out, "Fail")?;
            }
            Ok(false)
        }
    }
}

fn write_rows<W: Write, T: Display>(out: &mut W, rows: &[T]) -> Result<()> {
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

/// Echo the NL2SQL experiment results, one comma-joined line per CSV record.
///
/// Fields are written back as raw bytes, so the file does not have to be UTF-8. The csv reader
/// skips blank rows; they are recovered from the bytes consumed before each record and echoed as
/// empty lines.
fn print_results_file<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    if !path.is_file() {
        return Err(Error::ResultsFileNotFound { path: path.to_path_buf() });
    }

    let read_error = |source| Error::ResultsFile {
        path: path.to_path_buf(),
        source,
    };
    let raw = std::fs::read(path).map_err(|e| read_error(e.into()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_slice());

    let mut lines: Vec<Vec<u8>> = Vec::new();
    let mut record = csv::ByteRecord::new();
    let mut consumed = 0;
    let mut after_cr = false;
    loop {
        let more = reader.read_byte_record(&mut record).map_err(read_error)?;
        let end = usize::try_from(reader.position().byte()).map_or(raw.len(), |end| end.min(raw.len()));
        let chunk = &raw[consumed..end];

        lines.extend(std::iter::repeat_n(Vec::new(), skipped_blank_lines(chunk, after_cr)));
        if !more {
            break;
        }

        let fields: Vec<&[u8]> = record.iter().collect();
        lines.push(fields.join(&b","[..]));
        after_cr = chunk.last() == Some(&b'\r');
        consumed = end;
    }

    for line in &lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Number of empty lines at the start of `chunk`, the bytes the reader consumed for one record.
///
/// `after_cr` means the previous chunk ended inside a `\r\n` terminator, whose `\n` then
/// leads this chunk without starting a line of its own.
fn skipped_blank_lines(chunk: &[u8], after_cr: bool) -> usize {
    let mut run = &chunk[..chunk.iter().take_while(|&&b| b == b'\r' || b == b'\n').count()];
    if after_cr && run.first() == Some(&b'\n') {
        run = &run[1..];
    }

    // `\r\n` is one terminator; a lone `\r` or `\n` is one as well
    run.iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || run.get(i + 1) != Some(&b'\n'))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::load_sample_dataset;
    use sqlx::PgPool;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_report_mutation() {
        let command = Command::DeleteBaseModel { bmid: 1 };

        let mut out = Vec::new();
        assert!(report(&command, &Ok(()), &mut out).unwrap());
        assert_eq!(output(out), "Success\n");

        let mut out = Vec::new();
        let failed = Err(Error::Database(crate::db::errors::DbError::NotFound));
        assert!(!report(&command, &failed, &mut out).unwrap());
        assert_eq!(output(out), "Fail\n");
    }

    #[test]
    fn test_report_query_failure_is_silent() {
        let command = Command::ListInternetService { bmid: 1 };
        let failed = Err(Error::Other(anyhow::anyhow!("connection refused")));

        let mut out = Vec::new();
        assert!(!report(&command, &failed, &mut out).unwrap());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_results_file_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nl2sql_results.csv");
        std::fs::write(
            &path,
            "question,sql,correct\n\"List all users\",SELECT * FROM Users,true\n\"Count, please\",SELECT COUNT(*) FROM Users\n",
        )
        .unwrap();

        let config = Config {
            results_file: path,
            ..Default::default()
        };

        let mut out = Vec::new();
        execute(&Command::PrintNl2SqlResult, &config, &mut out).await.unwrap();
        assert_eq!(
            output(out),
            "question,sql,correct\nList all users,SELECT * FROM Users,true\nCount, please,SELECT COUNT(*) FROM Users\n"
        );
    }

    #[tokio::test]
    async fn test_missing_results_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            results_file: dir.path().join("nl2sql_results.csv"),
            ..Default::default()
        };

        let command = Command::PrintNl2SqlResult;
        let mut out = Vec::new();
        let result = execute(&command, &config, &mut out).await;
        assert!(matches!(result, Err(Error::ResultsFileNotFound { .. })));

        assert!(!report(&command, &result, &mut out).unwrap());
        assert_eq!(output(out), "Error: nl2sql_results.csv not found\n");
    }

    async fn echo_results(contents: &[u8]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nl2sql_results.csv");
        std::fs::write(&path, contents).unwrap();

        let config = Config {
            results_file: path,
            ..Default::default()
        };
        let mut out = Vec::new();
        execute(&Command::PrintNl2SqlResult, &config, &mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn test_results_file_keeps_blank_rows() {
        assert_eq!(echo_results(b"a,b\n\nc,d\n").await, b"a,b\n\nc,d\n");
        assert_eq!(echo_results(b"\na,b\n\n\n").await, b"\na,b\n\n\n");
        assert_eq!(echo_results(b"a,b\r\n\r\nc,d\r\n").await, b"a,b\n\nc,d\n");
        assert_eq!(echo_results(b"\"multi\nline\",x\n\ny\n").await, b"multi\nline,x\n\ny\n");
    }

    #[tokio::test]
    async fn test_results_file_echoes_non_utf8_bytes() {
        assert_eq!(echo_results(b"a,\xff\nc,d\n").await, b"a,\xff\nc,d\n");
    }

    #[test]
    fn test_skipped_blank_lines() {
        assert_eq!(skipped_blank_lines(b"a,b\n", false), 0);
        assert_eq!(skipped_blank_lines(b"\n\na,b\n", false), 2);
        assert_eq!(skipped_blank_lines(b"\r\n\r\na,b\r", false), 2);
        // trailing half of the previous record's terminator
        assert_eq!(skipped_blank_lines(b"\na,b\r", true), 0);
        assert_eq!(skipped_blank_lines(b"\n\r\na,b\r", true), 1);
    }

    #[test]
    fn test_unknown_environment_key_still_reports_per_command() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("AGENTCTL_LOG", "debug");

            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let invoke_line = |line: &[&str]| {
                let args = Args {
                    config: "agentctl.yaml".to_string(),
                    command: line.iter().map(|s| s.to_string()).collect(),
                };
                let mut out = Vec::new();
                let succeeded = runtime.block_on(invoke(&args, &mut out)).unwrap();
                (succeeded, output(out))
            };

            assert_eq!(invoke_line(&[]), (false, "Error: No function specified\n".to_string()));
            assert_eq!(invoke_line(&["deleteBaseModel"]), (false, "Error: Missing parameters\n".to_string()));
            assert_eq!(invoke_line(&["deleteBaseModel", "1"]), (false, "Fail\n".to_string()));
            assert_eq!(invoke_line(&["listInternetService", "1"]), (false, String::new()));
            Ok(())
        });
    }

    async fn run_lines(conn: &mut PgConnection, args: &[&str]) -> String {
        let command = Command::parse(args).unwrap();
        let mut out = Vec::new();
        let result = run(&command, conn, &Config::default(), &mut out).await;
        report(&command, &result, &mut out).unwrap();
        output(out)
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_internet_service_output(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        load_sample_dataset(&mut conn).await;

        assert_eq!(
            run_lines(&mut conn, &["listInternetService", "1"]).await,
            "2,https://acme.example.com/api,Acme AI\n3,s3://midway,Midway Storage\n1,https://zeta.example.com/v1,Zeta Cloud\n"
        );
        assert_eq!(run_lines(&mut conn, &["listInternetService", "404"]).await, "");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_count_customized_model_output(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        load_sample_dataset(&mut conn).await;

        assert_eq!(
            run_lines(&mut conn, &["countCustomizedModel", "3", "1", "99", "2"]).await,
            "1,General chat model,2\n2,Code assistant,1\n3,Legal summarizer,0\n"
        );
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_top_n_duration_output(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        load_sample_dataset(&mut conn).await;

        assert_eq!(
            run_lines(&mut conn, &["topNDurationConfig", "3", "3"]).await,
            "3,10,prod,temperature=0.2,300\n3,11,staging,temperature=0.7,300\n3,10,prod,temperature=0.2,120\n"
        );
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_keyword_output(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        load_sample_dataset(&mut conn).await;

        let lines = run_lines(&mut conn, &["listBaseModelKeyWord", "health"]).await;
        assert_eq!(lines.lines().count(), 5);
        assert_eq!(lines.lines().next(), Some("1,1,Zeta Cloud,healthcare"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_mutations_report_success_and_fail(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        load_sample_dataset(&mut conn).await;

        assert_eq!(run_lines(&mut conn, &["addCustomizedModel", "201", "2"]).await, "Success\n");
        assert_eq!(run_lines(&mut conn, &["addCustomizedModel", "201", "2"]).await, "Fail\n");
        assert_eq!(run_lines(&mut conn, &["addCustomizedModel", "1", "404"]).await, "Fail\n");

        let insert = [
            "insertAgentClient",
            "20",
            "erin",
            "erin@example.com",
            "4000000000000002",
            "Erin Lee",
            "2029-02-28",
            "999",
            "60601",
            "vision",
        ];
        assert_eq!(run_lines(&mut conn, &insert).await, "Success\n");
        assert_eq!(run_lines(&mut conn, &insert).await, "Fail\n");

        assert_eq!(run_lines(&mut conn, &["deleteBaseModel", "404"]).await, "Success\n");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_then_count(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        crate::test_utils::write_dataset(
            dir.path(),
            &[
                ("User.csv", "uid,email,username\n10,creator@example.com,creator\n"),
                ("AgentCreator.csv", "uid,bio,payout\n10,NULL,NULL\n"),
                ("BaseModel.csv", "bmid,creator_uid,description\n1,10,\"desc\"\n"),
            ],
        );
        let folder = dir.path().to_str().unwrap();

        assert_eq!(run_lines(&mut conn, &["import", folder]).await, "Success\n");
        assert_eq!(run_lines(&mut conn, &["countCustomizedModel", "1"]).await, "1,desc,0\n");
        assert_eq!(run_lines(&mut conn, &["deleteBaseModel", "1"]).await, "Success\n");
        assert_eq!(run_lines(&mut conn, &["countCustomizedModel", "1"]).await, "");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_import_of_missing_folder_fails(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(run_lines(&mut conn, &["import", "/definitely/not/here"]).await, "Fail\n");
    }
}
