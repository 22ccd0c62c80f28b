use anyhow::{Context, Result, bail};
use drafty::cli;
use drafty::config::{self, DraftyConfig};
use drafty::formatting::FormatKind;
use drafty::margin::MarginSide;
use drafty::service::DocumentService;
use drafty::store::SnapshotStore;
use std::io::BufRead;

const HELP: &str = "\
commands:
  text                      print the plain text
  markup                    print the HTML projection
  insert <index> <text>     insert text at a char index (\\n for newline)
  delete <start> <end>      delete the inclusive char range
  format <start> <end> <kind>
                            toggle bold|italic|subscript|superscript or set
                            body|title|heading|subheading over the range
  find <term> [start] [end] list (start, end) matches in the text
  margin <side> <mm>        set left|right|top|bottom margin in millimeters
  save <name>               save a snapshot
  load <name>               load a snapshot
  version                   print the current document version
  wait <since>              block until the version exceeds <since>
  quit";

/// Seed the sample document the way the original service boots.
async fn seed_document(service: &DocumentService) -> Result<()> {
    service.insert_text("This is a ", 0).await?;
    service.insert_text("sample ", 10).await?;
    service
        .insert_text(
            "document. \n And i am trying out some stuff right here. ",
            17,
        )
        .await?;
    service.switch_formatting(10, 16, FormatKind::Bold).await?;
    Ok(())
}

async fn run_command(service: &DocumentService, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(false);
    };
    match command {
        "text" => println!("{}", service.get_text().await),
        "markup" => println!("{}", service.get_markup().await),
        "insert" => {
            let index: usize = parts.next().context("usage: insert <index> <text>")?.parse()?;
            let rest = parts.collect::<Vec<_>>().join(" ");
            if rest.is_empty() {
                bail!("usage: insert <index> <text>");
            }
            service.insert_text(&rest.replace("\\n", "\n"), index).await?;
            println!("ok");
        }
        "delete" => {
            let start: usize = parts.next().context("usage: delete <start> <end>")?.parse()?;
            let end: usize = parts.next().context("usage: delete <start> <end>")?.parse()?;
            service.delete_range(start, end).await?;
            println!("ok");
        }
        "format" => {
            let usage = "usage: format <start> <end> <kind>";
            let start: usize = parts.next().context(usage)?.parse()?;
            let end: usize = parts.next().context(usage)?.parse()?;
            let kind: FormatKind = parts
                .next()
                .context(usage)?
                .parse()
                .map_err(anyhow::Error::msg)?;
            service.switch_formatting(start, end, kind).await?;
            println!("ok");
        }
        "find" => {
            let term = parts.next().context("usage: find <term> [start] [end]")?;
            let start: usize = match parts.next() {
                Some(s) => s.parse()?,
                None => 0,
            };
            let end: Option<usize> = match parts.next() {
                Some(e) => Some(e.parse()?),
                None => None,
            };
            for (match_start, match_end) in service.find(term, start, end).await {
                println!("({}, {})", match_start, match_end);
            }
        }
        "margin" => {
            let usage = "usage: margin <side> <mm>";
            let side: MarginSide = parts
                .next()
                .context(usage)?
                .parse()
                .map_err(anyhow::Error::msg)?;
            let value_mm: f64 = parts.next().context(usage)?.parse()?;
            service.set_margin(side, value_mm).await;
            println!("ok");
        }
        "save" => {
            let name = parts.next().context("usage: save <name>")?;
            service.save(name).await?;
            println!("ok");
        }
        "load" => {
            let name = parts.next().context("usage: load <name>")?;
            service.load(name).await?;
            println!("ok");
        }
        "version" => println!("{}", service.get_version().await),
        "wait" => {
            let since: u64 = parts.next().context("usage: wait <since>")?.parse()?;
            println!("{}", service.wait_for_change(since).await);
        }
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(true),
        other => bail!("unknown command '{}' (try 'help')", other),
    }
    Ok(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logger (set RUST_LOG env var to control verbosity)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match &cli_args.config {
        Some(path) => DraftyConfig::from_file(path).map_err(anyhow::Error::msg)?,
        None => DraftyConfig::default(),
    };

    let saves_dir = cli_args
        .saves_dir
        .or(config.saves_dir)
        .unwrap_or_else(config::default_saves_dir);
    log::info!("saves directory: {}", saves_dir.display());

    let service = DocumentService::new(SnapshotStore::new(saves_dir));
    if !cli_args.empty && config.seed_document.unwrap_or(true) {
        seed_document(&service).await?;
    }

    println!("drafty console (type 'help' for commands)");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match run_command(&service, &line).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}
