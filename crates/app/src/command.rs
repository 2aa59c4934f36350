//! REPL command parsing
//!
//! Commands are a closed enum matched exhaustively by the dispatcher, so a
//! new command cannot be added without the compiler pointing at every place
//! that must handle it.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/load <voice> [model_dir]` — register a voice; the path is
    /// remembered and optional on later loads.
    Load {
        voice: String,
        model_dir: Option<PathBuf>,
    },
    /// `/unload <voice>` — release the voice's model.
    Unload { voice: String },
    /// `/speaker <voice>` — select the active voice.
    Speaker { voice: String },
    /// `/prompt <voice> <audio_path> <transcript...>` — set reference audio.
    Prompt {
        voice: String,
        audio_path: PathBuf,
        transcript: String,
    },
    /// `/say <text...>` — speak with the active voice.
    Say { text: String },
    /// `/stop` — cancel the current session.
    Stop,
    /// `/help`
    Help,
    /// `/quit`
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/load" => {
                let mut parts = rest.split_whitespace();
                let voice = parts
                    .next()
                    .ok_or("Usage: /load <voice> [model_dir]")?
                    .to_string();
                let model_dir = parts.next().map(PathBuf::from);
                Ok(Command::Load { voice, model_dir })
            }
            "/unload" => {
                let voice = one_word(rest, "Usage: /unload <voice>")?;
                Ok(Command::Unload { voice })
            }
            "/speaker" => {
                let voice = one_word(rest, "Usage: /speaker <voice>")?;
                Ok(Command::Speaker { voice })
            }
            "/prompt" => {
                let usage = "Usage: /prompt <voice> <audio_path> <transcript>";
                let (voice, rest) = rest.split_once(char::is_whitespace).ok_or(usage)?;
                let (audio_path, transcript) =
                    rest.trim().split_once(char::is_whitespace).ok_or(usage)?;
                let transcript = transcript.trim();
                if transcript.is_empty() {
                    return Err(usage.to_string());
                }
                Ok(Command::Prompt {
                    voice: voice.to_string(),
                    audio_path: PathBuf::from(audio_path),
                    transcript: transcript.to_string(),
                })
            }
            "/say" => {
                if rest.is_empty() {
                    return Err("Usage: /say <text>".to_string());
                }
                Ok(Command::Say {
                    text: rest.to_string(),
                })
            }
            "/stop" => Ok(Command::Stop),
            "/help" => Ok(Command::Help),
            "/quit" | "/exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{other}'. Try /help.")),
        }
    }
}

fn one_word(rest: &str, usage: &str) -> Result<String, String> {
    let mut parts = rest.split_whitespace();
    let word = parts.next().ok_or(usage)?.to_string();
    if parts.next().is_some() {
        return Err(usage.to_string());
    }
    Ok(word)
}

pub const HELP_TEXT: &str = "\
Commands:
  /load <voice> [model_dir]             register a voice (path remembered)
  /unload <voice>                       release a voice's model
  /speaker <voice>                      select the active voice
  /prompt <voice> <audio> <transcript>  set the voice's reference audio
  /say <text>                           speak with the active voice
  /stop                                 cancel the current session
  /help                                 show this help
  /quit                                 exit";
