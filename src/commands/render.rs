//! Render one post page to stdout

use anyhow::Result;

use crate::page::PageState;
use crate::SpaceTraveling;

/// Print the HTML of the post `uid`; fails when it does not exist
pub async fn run(app: &SpaceTraveling, uid: &str) -> Result<()> {
    let generator = app.generator()?;
    let (state, html) = generator.render(uid).await?;

    if matches!(state, PageState::NotFound) {
        anyhow::bail!("No post with identifier {:?}", uid);
    }

    println!("{}", html);
    Ok(())
}
