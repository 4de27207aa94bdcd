//! Command-line dispatch.
//!
//! The first positional argument names the command, the rest are its positional arguments.
//! Everything is validated here, before any file or database is touched, so a usage error never
//! has side effects.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::models::agent_clients::AgentClientCreateDBRequest;
use crate::db::models::customized_models::CustomizedModelId;

/// Argument validation failures. The display text is printed verbatim on standard output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Error: No function specified")]
    NoCommand,

    #[error("Error: Missing folder name")]
    MissingFolder,

    #[error("Error: Missing parameters")]
    MissingParameters,

    #[error("Error: Invalid value '{value}' for {parameter}")]
    InvalidValue { parameter: &'static str, value: String },

    #[error("Error: Unknown function '{0}'")]
    UnknownCommand(String),
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Import { folder: PathBuf },
    InsertAgentClient(AgentClientCreateDBRequest),
    AddCustomizedModel(CustomizedModelId),
    DeleteBaseModel { bmid: i32 },
    ListInternetService { bmid: i32 },
    /// Never empty
    CountCustomizedModel { bmids: Vec<i32> },
    TopNDurationConfig { uid: i32, n: i64 },
    ListBaseModelKeyWord { keyword: String },
    PrintNl2SqlResult,
}

impl Command {
    /// Parse `command arg...` as typed on the command line.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, UsageError> {
        let (name, rest) = args.split_first().ok_or(UsageError::NoCommand)?;
        let args: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();

        let command = match name.as_ref() {
            "import" => {
                let folder = args.first().ok_or(UsageError::MissingFolder)?;
                Command::Import {
                    folder: PathBuf::from(folder),
                }
            }
            "insertAgentClient" => {
                require(&args, 9)?;
                Command::InsertAgentClient(AgentClientCreateDBRequest {
                    uid: number("uid", args[0])?,
                    username: args[1].to_string(),
                    email: args[2].to_string(),
                    card_number: number("card_number", args[3])?,
                    card_holder: args[4].to_string(),
                    expiration_date: date("expiration_date", args[5])?,
                    cvv: number("cvv", args[6])?,
                    zip: number("zip", args[7])?,
                    interests: args[8].to_string(),
                })
            }
            "addCustomizedModel" => {
                require(&args, 2)?;
                Command::AddCustomizedModel(CustomizedModelId {
                    mid: number("mid", args[0])?,
                    bmid: number("bmid", args[1])?,
                })
            }
            "deleteBaseModel" => {
                require(&args, 1)?;
                Command::DeleteBaseModel {
                    bmid: number("bmid", args[0])?,
                }
            }
            "listInternetService" => {
                require(&args, 1)?;
                Command::ListInternetService {
                    bmid: number("bmid", args[0])?,
                }
            }
            "countCustomizedModel" => {
                require(&args, 1)?;
                let bmids = args.iter().map(|a| number("bmid", a)).collect::<Result<_, _>>()?;
                Command::CountCustomizedModel { bmids }
            }
            "topNDurationConfig" => {
                require(&args, 2)?;
                let n: i64 = number("n", args[1])?;
                if n < 0 {
                    return Err(invalid("n", args[1]));
                }
                Command::TopNDurationConfig {
                    uid: number("uid", args[0])?,
                    n,
                }
            }
            "listBaseModelKeyWord" => {
                require(&args, 1)?;
                Command::ListBaseModelKeyWord {
                    keyword: args[0].to_string(),
                }
            }
            "printNL2SQLresult" => Command::PrintNl2SqlResult,
            other => return Err(UsageError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }

    /// The name the command is invoked by.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Import { .. } => "import",
            Command::InsertAgentClient(_) => "insertAgentClient",
            Command::AddCustomizedModel(_) => "addCustomizedModel",
            Command::DeleteBaseModel { .. } => "deleteBaseModel",
            Command::ListInternetService { .. } => "listInternetService",
            Command::CountCustomizedModel { .. } => "countCustomizedModel",
            Command::TopNDurationConfig { .. } => "topNDurationConfig",
            Command::ListBaseModelKeyWord { .. } => "listBaseModelKeyWord",
            Command::PrintNl2SqlResult => "printNL2SQLresult",
        }
    }

    /// Mutations report `Success` / `Fail`; queries report through their output rows.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Import { .. }
                | Command::InsertAgentClient(_)
                | Command::AddCustomizedModel(_)
                | Command::DeleteBaseModel { .. }
        )
    }

    /// Whether the command needs a database connection.
    pub fn uses_database(&self) -> bool {
        !matches!(self, Command::PrintNl2SqlResult)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn require(args: &[&str], count: usize) -> Result<(), UsageError> {
    if args.len() < count {
        return Err(UsageError::MissingParameters);
    }
    Ok(())
}

fn invalid(parameter: &'static str, value: &str) -> UsageError {
    UsageError::InvalidValue {
        parameter,
        value: value.to_string(),
    }
}

fn number<T: FromStr>(parameter: &'static str, value: &str) -> Result<T, UsageError> {
    value.trim().parse().map_err(|_| invalid(parameter, value))
}

fn date(parameter: &'static str, value: &str) -> Result<NaiveDate, UsageError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| invalid(parameter, value))
}
