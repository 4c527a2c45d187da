use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use filescout::error::{Result, ScoutError};
use filescout::{indexer, persistence, platform, tui};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("filescout: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let home = dirs::home_dir().ok_or(ScoutError::HomeDirUnavailable)?;
    let index_path = home.join(persistence::INDEX_FILE_NAME);

    // CLI: force a full rebuild and exit without entering the UI.
    if env::args().nth(1).as_deref() == Some("index") {
        return rebuild(&home, &index_path);
    }

    // Auto-setup: build the index if it has never been written. A cache
    // that exists but fails to load is a hard error, never a rebuild.
    if !index_path.exists() {
        println!("Index not found in home folder. Running setup...");
        rebuild(&home, &index_path)?;
    }

    let files = persistence::load_index(&index_path)?;
    if files.is_empty() {
        println!("Index is empty. Try running `filescout index` again.");
        return Ok(());
    }

    if let Some(selected) = tui::run(files)? {
        println!("Revealing: {selected}");
        platform::default_reveal().reveal(Path::new(&selected));
    }
    Ok(())
}

fn rebuild(home: &Path, index_path: &Path) -> Result<()> {
    println!("Indexing home directory...");
    let started = Instant::now();
    let files = indexer::build_file_index(home)?;
    println!(
        "Finished! Indexed {} files in {:.2?}",
        files.len(),
        started.elapsed()
    );
    persistence::save_index(index_path, &files)
}
