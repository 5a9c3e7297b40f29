use anyhow::Result;
use rtconfig::Client;

use super::model::ExistsCommand;

impl ExistsCommand {
    pub async fn run(&self, client: &Client) -> Result<()> {
        let config = client.config(&self.config);
        let exists = match &self.name {
            Some(name) => config.variable(name).exists(None).await?,
            None => config.exists(None).await?,
        };
        println!("{exists}");
        Ok(())
    }
}
