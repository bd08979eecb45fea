//! Command-line front end: draft decks from prompts, render slide XML,
//! inspect generated decks, and run the HTTP service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deckgen_core::{parse_deck, write_deck, Deck, SlideSource};
use deckgen_llm::{ChatClient, ModelConfig};
use deckgen_pptx::{PptxReader, PptxWriter, DEFAULT_DECK_FILENAME};
use deckgen_server::ServerConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Turn prompts into PowerPoint decks.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draft a deck from a prompt and write it as .pptx
    Generate {
        /// Prompt text; multiple words are joined with spaces
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Where the slide structure comes from
        #[arg(short, long, default_value_t = SlideSource::Heuristic)]
        source: SlideSource,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_DECK_FILENAME)]
        output: PathBuf,

        /// Also save the drafted slide XML
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "slide.xml")]
        save_xml: Option<PathBuf>,
    },

    /// Render an existing slide or presentation XML file
    Render {
        /// Input XML file
        xml: PathBuf,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_DECK_FILENAME)]
        output: PathBuf,
    },

    /// Print the outline of a .pptx deck
    Inspect {
        /// Input .pptx file
        pptx: PathBuf,

        /// Print JSON instead of presentation XML
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP service
    Serve {
        /// Address to bind (overrides DECKGEN_BIND)
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides DECKGEN_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Default slide source (overrides DECKGEN_SOURCE)
        #[arg(short, long)]
        source: Option<SlideSource>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match cli.command {
        Command::Generate {
            prompt,
            source,
            output,
            save_xml,
        } => generate(&prompt.join(" "), source, &output, save_xml.as_deref()).await,
        Command::Render { xml, output } => render(&xml, &output),
        Command::Inspect { pptx, json } => inspect(&pptx, json),
        Command::Serve { bind, port, source } => {
            let mut config = ServerConfig::from_env().context("Invalid server configuration")?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(source) = source {
                config.default_source = source;
            }
            deckgen_server::serve(config).await?;
            Ok(())
        }
    }
}

/// Draft a deck from a prompt and save it.
async fn generate(
    prompt: &str,
    source: SlideSource,
    output: &Path,
    save_xml: Option<&Path>,
) -> Result<()> {
    let client = match source {
        SlideSource::Model => Some(
            ChatClient::new(ModelConfig::from_env())
                .context("The model source needs DECKGEN_API_KEY")?,
        ),
        SlideSource::Heuristic => None,
    };

    let draft = deckgen_llm::draft(source, prompt, client.as_ref()).await?;
    log::debug!("Drafted {} slide(s) from {} source", draft.deck.len(), draft.source);

    if let Some(path) = save_xml {
        write_text(path, &draft.xml)?;
        eprintln!("Slide XML written to: {}", path.display());
    }

    save_deck(&draft.deck, output)
}

/// Render a slide or presentation XML file as .pptx.
fn render(xml_path: &Path, output: &Path) -> Result<()> {
    let xml = std::fs::read_to_string(xml_path)
        .with_context(|| format!("Failed to read {}", xml_path.display()))?;
    let deck = parse_deck(&xml)
        .with_context(|| format!("Failed to parse {}", xml_path.display()))?;

    save_deck(&deck, output)
}

/// Print a deck's outline.
fn inspect(path: &Path, json: bool) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let deck = PptxReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&deck)?);
    } else {
        println!("{}", write_deck(&deck));
    }

    Ok(())
}

fn save_deck(deck: &Deck, output: &Path) -> Result<()> {
    ensure_parent(output)?;
    PptxWriter::new()
        .save(deck, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Wrote {} slide(s) to: {}", deck.len(), output.display());
    Ok(())
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write to {}", path.display()))
}

/// Create the parent directory of `path` if it is missing.
fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["deckgen", "generate", "Slide:", "Intro"]).unwrap();
        match cli.command {
            Command::Generate {
                prompt,
                source,
                output,
                save_xml,
            } => {
                assert_eq!(prompt.join(" "), "Slide: Intro");
                assert_eq!(source, SlideSource::Heuristic);
                assert_eq!(output, PathBuf::from("GeneratedDeck.pptx"));
                assert!(save_xml.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_save_xml_default_name() {
        let cli = Cli::try_parse_from([
            "deckgen", "generate", "-s", "model", "--save-xml", "--", "Explain", "Rust",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                source, save_xml, ..
            } => {
                assert_eq!(source, SlideSource::Model);
                assert_eq!(save_xml, Some(PathBuf::from("slide.xml")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_source_rejected() {
        assert!(Cli::try_parse_from(["deckgen", "generate", "-s", "oracle", "hello world"]).is_err());
    }

    #[tokio::test]
    async fn test_generate_and_render_files() {
        let dir = tempfile::tempdir().unwrap();
        let deck_path = dir.path().join("out/deck.pptx");
        let xml_path = dir.path().join("slide.xml");

        generate(
            "Slide: Intro\n- Hello\nSlide: End\n- Bye",
            SlideSource::Heuristic,
            &deck_path,
            Some(&xml_path),
        )
        .await
        .unwrap();

        let file = File::open(&deck_path).unwrap();
        let deck = PptxReader::new().read(BufReader::new(file)).unwrap();
        assert_eq!(deck.len(), 2);

        let rendered = dir.path().join("rendered.pptx");
        render(&xml_path, &rendered).unwrap();
        let file = File::open(&rendered).unwrap();
        assert_eq!(PptxReader::new().read(BufReader::new(file)).unwrap(), deck);
    }

    #[tokio::test]
    async fn test_generate_rejects_short_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate("tiny", SlideSource::Heuristic, &dir.path().join("x.pptx"), None).await;
        assert!(result.is_err());
        assert!(!dir.path().join("x.pptx").exists());
    }
}
