use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rtconfig::{Client, Payload, Variable};
use time::format_description::well_known::Rfc3339;

use super::model::GetCommand;

impl GetCommand {
    pub async fn run(&self, client: &Client) -> Result<()> {
        let mut variable = client.config(&self.config).variable(&self.name);
        variable
            .reload(None)
            .await
            .with_context(|| format!("Failed to fetch variable {}", self.name))?;
        println!("{}", render_variable(&variable)?);
        Ok(())
    }
}

/// Multi-line description of a variable; binary values are shown base64 encoded.
pub fn render_variable(variable: &Variable) -> Result<String> {
    let mut lines = vec![format!("name: {}", variable.full_name()?)];
    match variable.payload() {
        Some(Payload::Text(text)) => lines.push(format!("text: {text}")),
        Some(Payload::Binary(value)) => lines.push(format!("value: {}", STANDARD.encode(value))),
        None => {}
    }
    lines.push(format!("state: {}", variable.state()));
    if let Some(update_time) = variable.update_time()? {
        lines.push(format!("update_time: {}", update_time.format(&Rfc3339)?));
    }
    Ok(lines.join("\n"))
}
