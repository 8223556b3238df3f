//! List the posts known to the repository

use anyhow::Result;

use crate::SpaceTraveling;

/// Print the identifier of every post
pub async fn run(app: &SpaceTraveling) -> Result<()> {
    let uids = app.source()?.list_known_identifiers().await?;

    println!("Posts ({}):", uids.len());
    for uid in uids {
        println!("  {}", uid);
    }

    Ok(())
}
