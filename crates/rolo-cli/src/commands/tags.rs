use rolo_core::models::all_tags;

use crate::commands::common::Context;
use crate::error::CliError;

pub fn list_tags(ctx: &Context) -> Result<Vec<String>, CliError> {
    let contacts = ctx.store().load_contacts()?;
    Ok(all_tags(&contacts))
}

pub fn run_tags(ctx: &Context, json: bool) -> Result<(), CliError> {
    let tags = list_tags(ctx)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        for tag in tags {
            println!("{tag}");
        }
    }
    Ok(())
}
