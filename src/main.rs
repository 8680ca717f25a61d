use anyhow::{anyhow, Result};
use codebench::{cli, config::Config, handlers, logging, snippets, tui};
use is_terminal::IsTerminal;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Load config; CLI flags override
    let mut cfg = Config::load();
    if let Some(base) = &args.api_base {
        cfg.set("API_BASE", base.clone());
    }
    if let Some(secs) = args.run_timeout {
        cfg.set("RUN_TIMEOUT", secs.to_string());
    }

    // Logging is best-effort; a bad log path must not block any mode
    if let Err(e) = logging::init(&cfg.log_file(), args.debug) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    if args.list_examples {
        for s in snippets::all() {
            println!("{}. {}", s.id, s.title);
        }
        return Ok(());
    }

    let color = io::stdout().is_terminal();
    match (args.check, args.run, args.file.as_deref()) {
        (true, _, Some(file)) => handlers::check::run(&cfg, file, color).await,
        (_, true, Some(file)) => handlers::run::run(&cfg, file, color).await,
        (false, false, file) => {
            let initial_text = match (file, args.example.as_deref()) {
                (Some(path), _) => std::fs::read_to_string(path)
                    .map_err(|e| anyhow!("failed to read '{}': {}", path.display(), e))?,
                (None, Some(id)) => snippets::lookup(id)
                    .map(|s| s.code.to_string())
                    .ok_or_else(|| anyhow!("unknown example '{}'; try --list-examples", id))?,
                (None, None) => snippets::STARTER.to_string(),
            };
            tui::run_workbench(&cfg, &initial_text).await
        }
        _ => Err(anyhow!("--check and --run need a FILE")),
    }
}
