use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use aria_foundation::RuntimeConfig;
use aria_session::{Engine, SessionOptions};
use aria_tts::DirectoryModelProvider;

mod backend;
mod command;
mod userdata;

use backend::ToneBackend;
use command::{Command, HELP_TEXT};
use userdata::UserData;

#[derive(Parser, Debug)]
#[command(name = "aria", about = "Streaming TTS assistant")]
struct Cli {
    /// Runtime config TOML file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where last-used model paths are remembered
    #[arg(long, default_value = "aria_user_data.toml")]
    user_data: PathBuf,
}

fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();
}

enum Flow {
    Continue,
    Quit,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };

    let backend = Arc::new(ToneBackend::new(config.sample_rate));
    let engine = Engine::new(backend, Arc::new(DirectoryModelProvider::new()), config);
    let mut user_data = UserData::load(&cli.user_data);
    let mut current_voice: Option<String> = None;

    println!("aria — streaming TTS assistant. Type /help for commands.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            prompt();
            continue;
        }
        match Command::parse(line) {
            Ok(cmd) => {
                match dispatch(&engine, &mut user_data, &cli, &mut current_voice, cmd)? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
            Err(msg) => println!("{msg}"),
        }
        prompt();
    }

    engine.stop();
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn dispatch(
    engine: &Engine,
    user_data: &mut UserData,
    cli: &Cli,
    current_voice: &mut Option<String>,
    cmd: Command,
) -> Result<Flow> {
    match cmd {
        Command::Load { voice, model_dir } => {
            let dir = model_dir.or_else(|| user_data.last_model_paths.get(&voice).cloned());
            match dir {
                None => println!("No model path given and none remembered for '{voice}'."),
                Some(dir) => match engine.load_voice(&voice, &dir) {
                    Ok(()) => {
                        user_data.last_model_paths.insert(voice.clone(), dir);
                        user_data.save(&cli.user_data);
                        println!("Loaded voice '{voice}'.");
                    }
                    Err(e) => println!("Load failed: {e}"),
                },
            }
        }
        Command::Unload { voice } => {
            engine.unload_voice(&voice);
            if current_voice.as_deref() == Some(voice.as_str()) {
                *current_voice = None;
            }
            println!("Unloaded voice '{voice}'.");
        }
        Command::Speaker { voice } => {
            if engine.registry().has_profile(&voice) {
                println!("Active voice is now '{voice}'.");
                *current_voice = Some(voice);
            } else {
                println!("Voice '{voice}' is not loaded. Use /load first.");
            }
        }
        Command::Prompt {
            voice,
            audio_path,
            transcript,
        } => {
            engine.set_reference_audio(&voice, &audio_path, &transcript);
            if engine.registry().has_reference(&voice) {
                println!("Reference audio set for '{voice}'.");
            }
        }
        Command::Say { text } => match current_voice {
            None => println!("No active voice. Use /speaker <voice> first."),
            Some(voice) => {
                if !engine.registry().has_reference(voice) {
                    println!("Voice '{voice}' has no reference audio. Use /prompt first.");
                } else {
                    // Playback runs in the background so /stop stays usable.
                    engine.pipeline().start_session(SessionOptions {
                        voice: Some(voice.clone()),
                        play: true,
                        ..SessionOptions::default()
                    })?;
                    engine.pipeline().feed(&text);
                    engine.pipeline().end_session();
                }
            }
        },
        Command::Stop => {
            engine.stop();
            println!("Stopped.");
        }
        Command::Help => println!("{HELP_TEXT}"),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
