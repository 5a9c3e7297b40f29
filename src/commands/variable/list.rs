use anyhow::Result;
use rtconfig::{Client, Variable};
use time::format_description::well_known::Rfc3339;

use super::model::ListCommand;

impl ListCommand {
    pub async fn run(&self, client: &Client) -> Result<()> {
        let variables = client
            .config(&self.config)
            .list_all_variables(None)
            .await?;
        for variable in &variables {
            println!("{}", summary_line(variable)?);
        }
        Ok(())
    }
}

/// `name<TAB>state<TAB>update time`, with `-` for an unknown update time.
pub fn summary_line(variable: &Variable) -> Result<String> {
    let update_time = match variable.update_time()? {
        Some(update_time) => update_time.format(&Rfc3339)?,
        None => "-".to_string(),
    };
    Ok(format!("{}\t{}\t{}", variable.name, variable.state(), update_time))
}
