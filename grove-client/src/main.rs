use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grove_client::{GroveClient, run_import};
use grove_core::{
    GameType,
    import::{ImportOverrides, ImportedGame, apply_overrides, parse_csv, parse_xml},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, env = "GROVE_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    #[arg(long, env = "GROVE_ADMIN_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import games from a CSV export or an XML feed.
    Import {
        #[command(subcommand)]
        source: ImportSource,
    },
    /// Upload images or ROM files.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ImportSource {
    Csv {
        file: PathBuf,

        #[command(flatten)]
        options: ImportOptions,
    },
    Xml {
        #[arg(required_unless_present = "url")]
        file: Option<PathBuf>,

        /// Download the feed instead of reading a local file.
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        #[command(flatten)]
        options: ImportOptions,
    },
}

#[derive(Args, Debug)]
struct ImportOptions {
    #[arg(long = "type", default_value = "emulator")]
    game_type: String,

    #[arg(long)]
    category: Option<String>,

    /// Override the type and category of every row.
    #[arg(long)]
    force: bool,

    /// Parse and preview without submitting.
    #[arg(long)]
    dry_run: bool,
}

impl ImportOptions {
    fn overrides(&self) -> Result<ImportOverrides, String> {
        let game_type = self
            .game_type
            .parse::<GameType>()
            .map_err(|e| e.to_string())?;
        Ok(ImportOverrides {
            game_type,
            category: self.category.clone(),
            force: self.force,
        })
    }
}

async fn load_games(client: &GroveClient, source: &ImportSource) -> Result<Vec<ImportedGame>, String> {
    match source {
        ImportSource::Csv { file, .. } => {
            let text = tokio::fs::read_to_string(file)
                .await
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            Ok(parse_csv(&text))
        }
        ImportSource::Xml { file, url, .. } => {
            let text = match (url, file) {
                (Some(url), _) => client.fetch_text(url).await.map_err(|e| e.to_string())?,
                (None, Some(file)) => tokio::fs::read_to_string(file)
                    .await
                    .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?,
                (None, None) => return Err("An XML file or --url is required".to_string()),
            };
            parse_xml(&text).map_err(|e| e.to_string())
        }
    }
}

async fn import(client: &GroveClient, source: ImportSource) -> Result<(), String> {
    let options = match &source {
        ImportSource::Csv { options, .. } | ImportSource::Xml { options, .. } => options,
    };
    let overrides = options.overrides()?;
    let games = apply_overrides(load_games(client, &source).await?, &overrides);
    println!("Parsed {} games", games.len());
    if options.dry_run {
        for game in games.iter().take(10) {
            println!("  {} [{}] {}", game.title, game.game_type, game.game_url);
        }
        return Ok(());
    }

    let report = run_import(client, &games, |n, total, outcome| match outcome {
        Ok(created) => println!("Batch {}/{}: {} created", n, total, created),
        Err(e) => eprintln!("Batch {}/{} failed: {}", n, total, e),
    })
    .await;
    println!("{}", report.summary());
    Ok(())
}

async fn upload(client: &GroveClient, files: Vec<PathBuf>) -> Result<(), String> {
    let mut uploaded = 0;
    for file in &files {
        match client.upload_file(file).await {
            Ok(url) => {
                println!("{} → {}", file.display(), url);
                uploaded += 1;
            }
            Err(e) => eprintln!("{}: {}", file.display(), e),
        }
    }
    println!("{} / {} files uploaded", uploaded, files.len());
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = GroveClient::new(cli.server, cli.token);

    let result = match cli.command {
        Command::Import { source } => import(&client, source).await,
        Command::Upload { files } => upload(&client, files).await,
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
