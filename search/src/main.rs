use anyhow::Context;
use clap::Parser;
use flexi_logger::{FileSpec, Logger, WriteMode};
use log::{info, warn};
use movies_search::{
    cli::Cli,
    config_manager::ConfigManager,
    domain::MoviesPage,
    use_cases::SearchMoviesRequest,
    AppContainer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.create_config {
        ConfigManager::create_default_config(&cli.config)
            .with_context(|| format!("Failed to create config file {}", cli.config.display()))?;
        println!("Created default configuration file: {}", cli.config.display());
        return Ok(());
    }

    let mut config_manager = ConfigManager::new(&cli.config)
        .with_context(|| format!("Failed to load config file {}", cli.config.display()))?;
    config_manager.merge_with_cli_args(&cli);

    let mut logger =
        Logger::try_with_str(&config_manager.config().log_level)?.write_mode(WriteMode::BufferAndFlush);
    logger = if cli.log_to_file {
        logger.log_to_file(FileSpec::default())
    } else {
        logger.log_to_stderr()
    };
    let _logger = logger.start()?;

    if let Err(errors) = config_manager.validate_config() {
        for error in &errors {
            warn!("Configuration error: {}", error);
        }
        anyhow::bail!("Configuration validation failed: {}", errors.join("; "));
    }

    let config = config_manager.into_config();
    let container = AppContainer::new(&config)?;

    if let Some(count) = cli.recent {
        let recent = container.fetch_recent_queries_use_case().execute(count).await?;
        for query in recent {
            println!("{}  {}", query.created_at.format("%Y-%m-%d %H:%M"), query.query);
        }
        return Ok(());
    }

    let query = cli.query.context("No query given")?;
    info!("Searching for {:?}, page {}", query, cli.page);
    let page = container
        .search_movies_use_case()
        .execute(SearchMoviesRequest::new(query, cli.page))
        .await?;
    print_page(&page);

    if let (Some(width), Some(out)) = (cli.poster_width, &cli.poster_out) {
        let Some(poster_path) = page.movies.iter().find_map(|m| m.poster_path.clone()) else {
            warn!("No result has a poster");
            return Ok(());
        };
        let slot = container.poster_image_slot();
        slot.load(poster_path, width);
        slot.finished().await;
        match slot.image() {
            Some(image) => {
                tokio::fs::write(out, &image)
                    .await
                    .with_context(|| format!("Failed to write poster to {}", out.display()))?;
                println!("Saved poster ({} bytes) to {}", image.len(), out.display());
            }
            None => warn!("Poster could not be downloaded"),
        }
    }

    Ok(())
}

fn print_page(page: &MoviesPage) {
    for movie in &page.movies {
        let year = movie
            .release_date
            .map(|d| d.format("%Y").to_string())
            .unwrap_or_else(|| "----".to_string());
        println!(
            "{:>8}  {}  {}",
            movie.id,
            year,
            movie.title.as_deref().unwrap_or("(untitled)")
        );
    }
    println!("page {} of {}", page.page, page.total_pages);
}
