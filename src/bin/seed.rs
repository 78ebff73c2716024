use std::path::PathBuf;

use clap::Parser;
use meveddet::{
    config::Settings,
    domain::{Activity, Announcement, Record},
    repository::{JsonFileStore, RecordStore},
};

/// Writes the built-in sample announcements and activities into the data directory.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Data directory (defaults to storage.data_dir from the configuration)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Overwrite collections that already contain records
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => PathBuf::from(Settings::new().unwrap_or_default().storage.data_dir),
    };

    println!("🌱 Seeding {}", data_dir.display());

    seed::<Announcement>(&data_dir, args.force).await?;
    seed::<Activity>(&data_dir, args.force).await?;

    println!("✅ Done");
    Ok(())
}

async fn seed<T: Record>(data_dir: &std::path::Path, force: bool) -> anyhow::Result<()> {
    let store = JsonFileStore::<T>::new(data_dir);

    // A corrupt file counts as occupied; only --force replaces it
    let existing = store.load().await.map(|records| records.len()).unwrap_or(usize::MAX);
    if existing > 0 && !force {
        println!("⏭️  {} already has data, skipping (use --force to overwrite)", store.path().display());
        return Ok(());
    }

    let samples = T::samples();
    store.save(&samples).await?;
    println!("📋 Wrote {} {} to {}", samples.len(), T::COLLECTION, store.path().display());

    Ok(())
}
