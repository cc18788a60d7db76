use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use frontend::api::DEFAULT_API_URL;
use frontend::{FlowState, HttpPodcastApi, LocalStore, LogNotifier, PodcastFlow};
use shared::{data_uri, find_voice, voice_options};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

/// Generate short AI podcasts from the command line.
#[derive(Parser, Debug)]
#[command(name = "podcast", author, version, about)]
struct Cli {
    /// Base URL of the podcast backend.
    #[arg(long, env = "PODCAST_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Where settings and history are kept.
    #[arg(long, env = "PODCAST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available voices
    Voices,
    /// Save a short sample of a voice
    Preview {
        /// Voice name or id
        voice: String,
        #[arg(long, default_value = "preview.mp3")]
        out: PathBuf,
    },
    /// Set the topic of the next podcast
    Prompt { text: String },
    /// Select the narrating voice by name or id
    Voice { name: String },
    /// Generate a podcast from the saved prompt and voice
    Generate {
        /// Also write the audio to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show past podcasts, newest first
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();
    let dir = cli.data_dir.unwrap_or_else(LocalStore::default_dir);
    let store = LocalStore::open(&dir)
        .with_context(|| format!("opening data directory {}", dir.display()))?;
    let flow = PodcastFlow::new(
        HttpPodcastApi::new(cli.api_url),
        store,
        Arc::new(LogNotifier),
    );

    match cli.command {
        Command::Voices => {
            let selected = flow.settings().selected_voice.map(|v| v.id);
            for voice in voice_options() {
                let mark = if selected.as_deref() == Some(voice.id.as_str()) { "*" } else { " " };
                println!(
                    "{mark} {:<8} {:?} {:?}  {}",
                    voice.name, voice.nationality, voice.gender, voice.id
                );
            }
        }
        Command::Preview { voice, out } => {
            let voice = find_voice(&voice).ok_or_else(|| anyhow!("unknown voice {voice}"))?;
            let uri = flow.preview(&voice.id).await?;
            let audio = data_uri::decode(&uri)?;
            tokio::fs::write(&out, &audio.bytes).await?;
            println!("Saved {} sample to {}", voice.name, out.display());
        }
        Command::Prompt { text } => {
            flow.set_prompt(text)?;
        }
        Command::Voice { name } => {
            let voice = find_voice(&name).ok_or_else(|| anyhow!("unknown voice {name}"))?;
            println!("Selected {}", voice.name);
            flow.select_voice(voice)?;
        }
        Command::Generate { out } => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let mut states = flow.subscribe();
            tokio::spawn(async move {
                while states.changed().await.is_ok() {
                    match *states.borrow_and_update() {
                        FlowState::GeneratingScript => println!("Generating script..."),
                        FlowState::GeneratingAudio => println!("Generating audio..."),
                        _ => {}
                    }
                }
            });

            let podcast = flow.generate(&cancel).await?;
            println!("\n{}\n", podcast.script);
            if let Some(out) = out {
                let audio = data_uri::decode(&podcast.audio_url)?;
                tokio::fs::write(&out, &audio.bytes).await?;
                println!("Audio written to {}", out.display());
            }
        }
        Command::History => {
            for podcast in flow.history() {
                println!(
                    "{}  {}  {:<8} {}",
                    podcast.id,
                    podcast.created_at.format("%Y-%m-%d %H:%M"),
                    podcast.voice.name,
                    podcast.prompt
                );
            }
        }
    }
    Ok(())
}
