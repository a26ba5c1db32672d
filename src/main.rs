//! Meme Maker - imgflip template browser and captioner
//!
//! Browses the imgflip template catalog, captions templates remotely or
//! draws captions locally onto an image file, and keeps a persisted record
//! of created memes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use meme_maker::api::download::DEFAULT_FILENAME;
use meme_maker::{
    download_image, CaptionClient, CaptionRenderer, CaptionText, Credentials, FileStorage,
    MemeLibrary, MemeStore,
};

/// imgflip meme browser and captioner
#[derive(Parser, Debug)]
#[command(name = "meme_maker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the created-meme store
    #[arg(long, default_value_t = default_store_dir())]
    store_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the meme template catalog
    Templates,
    /// Pick and print a random template from the catalog
    Random,
    /// Caption a template through the imgflip API
    Caption {
        /// Template id to caption
        #[arg(long)]
        template_id: String,
        /// Caption text; repeat for one entry per text box
        #[arg(long = "text", required = true)]
        texts: Vec<String>,
        /// imgflip username (defaults to $IMGFLIP_USERNAME)
        #[arg(long)]
        username: Option<String>,
        /// imgflip password (defaults to $IMGFLIP_PASSWORD)
        #[arg(long)]
        password: Option<String>,
        /// Record the captioned meme in the created-meme store
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Caption a local image file by drawing text onto it
    Custom {
        /// Path to the source image
        #[arg(long)]
        image: PathBuf,
        /// Path to a TTF/OTF font used for the captions
        #[arg(long)]
        font: PathBuf,
        /// Top caption text
        #[arg(long, default_value = "")]
        top: String,
        /// Bottom caption text
        #[arg(long, default_value = "")]
        bottom: String,
        /// Write the captioned JPEG here instead of printing the data URL
        #[arg(long)]
        output: Option<PathBuf>,
        /// Record the result in the created-meme store
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Download a rendered meme image to a file
    Download {
        /// Image URL to download
        url: String,
        /// Target filename
        #[arg(long, default_value = DEFAULT_FILENAME)]
        output: PathBuf,
    },
    /// Manage the created-meme store
    Created {
        #[command(subcommand)]
        action: CreatedAction,
    },
}

#[derive(Subcommand, Debug)]
enum CreatedAction {
    /// List recorded memes
    List,
    /// Remove one recorded meme by id
    Remove { id: i64 },
    /// Remove all recorded memes
    Clear,
}

/// Returns the default store directory under the platform data dir.
fn default_store_dir() -> String {
    FileStorage::default_dir().to_string_lossy().to_string()
}

/// Build credentials from flags or the environment; exits if neither is set.
fn credentials(username: Option<String>, password: Option<String>) -> Credentials {
    let username = username.or_else(|| std::env::var("IMGFLIP_USERNAME").ok());
    let password = password.or_else(|| std::env::var("IMGFLIP_PASSWORD").ok());

    match (username, password) {
        (Some(username), Some(password)) => Credentials { username, password },
        _ => {
            eprintln!(
                "Error: imgflip credentials required (--username/--password \
                 or IMGFLIP_USERNAME/IMGFLIP_PASSWORD)"
            );
            std::process::exit(2);
        }
    }
}

/// Decode the payload of a `data:image/jpeg;base64,...` URL.
fn data_url_bytes(data_url: &str) -> meme_maker::Result<Vec<u8>> {
    use base64::Engine as _;

    let payload = match data_url.split_once(',') {
        Some((_, payload)) => payload,
        None => data_url,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| meme_maker::MemeError::ImageLoad(format!("decode data URL: {e}")))
}

async fn run(args: Args) -> meme_maker::Result<()> {
    let store = MemeStore::new(FileStorage::new(&PathBuf::from(&args.store_dir)));

    match args.command {
        Command::Templates => {
            let mut library = MemeLibrary::new();
            library.load().await;
            for template in library.templates() {
                println!(
                    "{:>12}  {} ({} boxes)\n              {}",
                    template.id, template.name, template.box_count, template.url
                );
            }
        }
        Command::Random => {
            let mut library = MemeLibrary::new();
            library.load().await;
            match library.current() {
                Some(template) => {
                    println!("{} ({} boxes)", template.name, template.box_count);
                    println!("id:  {}", template.id);
                    println!("url: {}", template.url);
                }
                None => println!("No templates available"),
            }
        }
        Command::Caption {
            template_id,
            texts,
            username,
            password,
            save,
        } => {
            let client = CaptionClient::new(credentials(username, password));
            let texts = if texts.len() == 1 {
                CaptionText::Single(texts.into_iter().next().unwrap_or_default())
            } else {
                CaptionText::Boxes(texts)
            };

            let meme = client.caption(&template_id, &texts).await?;
            println!("image: {}", meme.image_url);
            println!("page:  {}", meme.page_url);

            if save && !store.save(&meme.image_url) {
                log::warn!("Failed to record created meme");
            }
        }
        Command::Custom {
            image,
            font,
            top,
            bottom,
            output,
            save,
        } => {
            let image_bytes = std::fs::read(&image)?;
            let font_bytes = std::fs::read(&font)?;

            let mut renderer = CaptionRenderer::new(font_bytes)?;
            let data_url = renderer.render_caption(&image_bytes, &top, &bottom)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, data_url_bytes(&data_url)?)?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{}", data_url),
            }

            if save && !store.save(&data_url) {
                log::warn!("Failed to record created meme");
            }
        }
        Command::Download { url, output } => {
            download_image(&url, &output).await?;
            println!("Wrote {}", output.display());
        }
        Command::Created { action } => match action {
            CreatedAction::List => {
                let records = store.list();
                if records.is_empty() {
                    println!("No created memes recorded");
                }
                for record in records {
                    println!("{:>15}  {}  {}", record.id, record.created_at, record.url);
                }
            }
            CreatedAction::Remove { id } => {
                if store.remove(id) {
                    println!("Removed {}", id);
                } else {
                    println!("Failed to remove {}", id);
                }
            }
            CreatedAction::Clear => {
                if store.clear() {
                    println!("Cleared created memes");
                } else {
                    println!("Failed to clear created memes");
                }
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
