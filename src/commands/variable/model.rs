use anyhow::Result;
use clap::{ArgGroup, Parser};
use rtconfig::Client;

#[derive(Parser, Debug)]
pub enum VariableCommand {
    /// Fetch a variable and print its payload and metadata
    Get(GetCommand),
    /// Update a variable, creating it when it does not exist yet
    Set(SetCommand),
    /// Print whether a variable (or, without a name, the config) exists
    Exists(ExistsCommand),
    /// List every variable of a config
    #[clap(alias = "ls")]
    List(ListCommand),
}

impl VariableCommand {
    pub async fn run(&self, client: &Client) -> Result<()> {
        match self {
            VariableCommand::Get(cmd) => cmd.run(client).await,
            VariableCommand::Set(cmd) => cmd.run(client).await,
            VariableCommand::Exists(cmd) => cmd.run(client).await,
            VariableCommand::List(cmd) => cmd.run(client).await,
        }
    }
}

#[derive(Parser, Debug)]
pub struct GetCommand {
    pub config: String,
    pub name: String,
}

#[derive(Parser, Debug)]
#[clap(group(ArgGroup::new("payload").required(true).args(["text", "base64"])))]
pub struct SetCommand {
    pub config: String,
    pub name: String,
    /// UTF-8 text payload
    #[clap(short, long)]
    pub text: Option<String>,
    /// Binary payload, given base64 encoded
    #[clap(short, long)]
    pub base64: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ExistsCommand {
    pub config: String,
    pub name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ListCommand {
    pub config: String,
}
