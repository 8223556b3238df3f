//! Generate static post pages

use anyhow::Result;

use crate::SpaceTraveling;

/// Render every known post into the public directory
pub async fn run(app: &SpaceTraveling) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = app.generator()?;
    let written = generator.write_static(&app.public_dir).await?;

    tracing::info!(
        "Generated {} posts into {:?} in {:.2}s",
        written.len(),
        app.public_dir,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
