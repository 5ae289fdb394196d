use clap::Parser;
use heritage_atlas::config::{CodeAction, Command, OutputFormat};
use heritage_atlas::domain::model::Site;
use heritage_atlas::domain::ports::ConfigProvider;
use heritage_atlas::utils::error::ErrorSeverity;
use heritage_atlas::utils::{logger, validation::Validate};
use heritage_atlas::{AppConfig, Atlas, AtlasError, CliConfig, LocalStorage};
use std::io::Write;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.app_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = run(cli.command, &config).await {
        exit_with(&e);
    }
}

async fn run(command: Command, config: &AppConfig) -> heritage_atlas::Result<()> {
    let storage = LocalStorage::new(config.storage_path());
    let mut atlas = Atlas::bootstrap(config, storage).await?;

    match command {
        Command::Sites {
            format,
            visited_only,
        } => {
            let sites: Vec<&Site> = atlas
                .catalog()
                .sites()
                .iter()
                .filter(|site| !visited_only || atlas.is_visited(&site.name))
                .collect();
            print_sites(&atlas, &sites, format)?;
        }
        Command::Toggle { name } => {
            if !atlas.catalog().contains_name(&name) {
                tracing::warn!("'{}' is not in the current catalog", name);
            }
            let visited = atlas.toggle(&name).await?;
            println!(
                "{} {}",
                if visited { "✓ Visited:" } else { "✗ Unmarked:" },
                name
            );
        }
        Command::Visited => {
            for name in atlas.store().visited() {
                println!("{}", name);
            }
        }
        Command::Stats => {
            let stats = atlas.stats();
            println!("Catalog source: {}", atlas.catalog().origin());
            println!("Total sites:    {}", stats.total);
            println!("Visited:        {}", stats.visited);
            println!("Remaining:      {}", stats.remaining);
            println!(
                "Sync:           {}",
                if atlas.gate().is_active() { "Gist Sync" } else { "Local Only" }
            );
        }
        Command::Code { action } => match action {
            CodeAction::Set { code } => {
                let applied = atlas.enter_access_code(&code).await?;
                println!("✅ Access code accepted. Data will now sync from the remote snapshot.");
                if applied {
                    println!("📥 {} visited sites loaded", atlas.store().len());
                } else {
                    println!("⚠️  Remote snapshot unavailable, keeping local data");
                }
            }
            CodeAction::Clear => {
                atlas.clear_access_code().await?;
                println!("Access code removed, using local storage only");
            }
        },
        Command::Theme { theme } => {
            atlas.set_theme(theme).await?;
            println!("Theme set to {}", theme.as_str());
        }
        Command::Export { output } => {
            let path = atlas.write_export(output.as_deref()).await?;
            println!("📁 Data exported to: {}", path.display());
        }
    }

    Ok(())
}

fn print_sites(
    atlas: &Atlas<LocalStorage>,
    sites: &[&Site],
    format: OutputFormat,
) -> heritage_atlas::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Table => {
            for site in sites {
                writeln!(
                    out,
                    "{} {} ({}) [{}, {}] {} {}",
                    if atlas.is_visited(&site.name) { "✓" } else { " " },
                    site.name,
                    site.country,
                    site.lat,
                    site.lng,
                    site.year_inscribed,
                    site.criteria
                )?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["name", "country", "lat", "lng", "year", "criteria", "visited"])?;
            for site in sites {
                writer.write_record([
                    site.name.clone(),
                    site.country.clone(),
                    site.lat.to_string(),
                    site.lng.to_string(),
                    site.year_inscribed.to_string(),
                    site.criteria.clone(),
                    atlas.is_visited(&site.name).to_string(),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, sites)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

fn exit_with(e: &AtlasError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
