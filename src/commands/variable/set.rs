use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::info;
use rtconfig::{Client, Variable};

use super::model::SetCommand;

impl SetCommand {
    pub async fn run(&self, client: &Client) -> Result<()> {
        let mut variable = self.to_variable(client)?;

        // Optimistically update; only a missing variable falls back to create
        if variable.update(None).await? {
            println!("Updated {}", variable.full_name()?);
        } else if variable.create(None).await? {
            println!("Created {}", variable.full_name()?);
        } else {
            anyhow::bail!(
                "Variable {} was created concurrently; run the command again to update it",
                variable.full_name()?
            );
        }
        info!("Variable {} stored with state {}", variable.name, variable.state());
        Ok(())
    }

    /// Local variable carrying the payload given on the command line.
    pub fn to_variable(&self, client: &Client) -> Result<Variable> {
        let mut variable = client.config(&self.config).variable(&self.name);
        match (&self.text, &self.base64) {
            (Some(text), _) => variable.set_text(text.as_str())?,
            (None, Some(encoded)) => {
                let value = STANDARD
                    .decode(encoded.trim())
                    .context("--base64 value is not valid base64")?;
                variable.set_value(value)?;
            }
            (None, None) => anyhow::bail!("Either --text or --base64 is required"),
        }
        Ok(variable)
    }
}
