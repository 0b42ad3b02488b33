use anyhow::Result;
use deadlines::cli::{self, Command};
use deadlines::config::Config;
use deadlines::context::StandardContext;
use deadlines::loader::DatasetSources;
use deadlines::logging::{self, LogTarget};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        cli::print_help("deadlines");
        return Ok(());
    }

    let ctx = StandardContext::new(args.root.clone());

    // A broken config file is reported rather than replaced with defaults.
    let cfg = match Config::load_or_init(&ctx) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration:\n{:#}", e);
            std::process::exit(1);
        }
    };

    let sources = DatasetSources::resolve(&cfg, &ctx)?
        .with_overrides(args.conferences.as_deref(), &args.taxonomies)?;

    match args.command {
        Command::List { search } => {
            logging::init_logging(cfg.log_level, LogTarget::Stderr)?;
            let now = chrono::Utc::now();
            let list = cli::list_deadlines(&cfg, &sources, search.as_deref(), now).await?;
            for line in cli::render_list(&list, now) {
                println!("{}", line);
            }
            Ok(())
        }
        _ => deadlines::tui::run(&ctx, cfg, sources).await,
    }
}
