use bunny_storage::utils::logger;
use bunny_storage::{BunnyStorage, CliConfig, Command, Result, Storage, StorageError};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // Logging first, so config errors are reported through it.
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let storage_config = match config.storage_config() {
        Ok(storage_config) => storage_config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let storage = BunnyStorage::new(storage_config);

    if let Err(e) = run(&storage, config.command).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}

async fn run(storage: &BunnyStorage, command: Command) -> Result<()> {
    match command {
        Command::Put { name, file } => {
            let data = tokio::fs::read(&file).await?;
            let saved = storage.save(&name, &data).await?;
            tracing::info!("✅ Uploaded {} ({} bytes)", saved, data.len());
            println!("{}", storage.url(&saved));
        }
        Command::Get { name, out } => {
            let mut reader = storage.open(&name).await?;
            match out {
                Some(path) => {
                    let mut file = tokio::fs::File::create(&path).await?;
                    let written = tokio::io::copy(&mut reader, &mut file).await?;
                    tracing::info!("📁 Saved {} bytes to {}", written, path.display());
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    tokio::io::copy(&mut reader, &mut stdout).await?;
                }
            }
        }
        Command::Rm { name } => {
            storage.delete(&name).await?;
            tracing::info!("🗑️ Deleted {}", name);
        }
        Command::Exists { name } => {
            let exists = storage.exists(&name).await?;
            println!("{}", exists);
            if !exists {
                std::process::exit(3);
            }
        }
        Command::Url { name } => println!("{}", storage.url(&name)),
        Command::Size { name } => println!("{}", storage.size(&name).await?),
        Command::Ls { path } => {
            let (directories, files) = storage.listdir(path.as_deref().unwrap_or("")).await?;
            for directory in directories {
                println!("{}/", directory);
            }
            for file in files {
                println!("{}", file);
            }
        }
        Command::Ctime { name } => println!("{}", storage.get_created_time(&name).await?),
        Command::Mtime { name } => println!("{}", storage.get_modified_time(&name).await?),
    }

    Ok(())
}

fn exit_code(error: &StorageError) -> i32 {
    if error.is_config_error() {
        1
    } else if error.is_not_found() {
        3
    } else {
        2
    }
}
