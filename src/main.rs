use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shorts_harvester::cli::{Cli, Commands, OutputFormat};
use shorts_harvester::config::Config;
use shorts_harvester::platform::YoutubeDataClient;
use shorts_harvester::{output, utils, HarvestError, HarvestRequest, ShortsPipeline};

fn init_tracing(verbose: bool, quiet: bool, json: bool) {
    let default_filter = if verbose {
        "shorts_harvester=debug"
    } else if quiet {
        "shorts_harvester=warn"
    } else {
        "shorts_harvester=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

/// Print a fatal harvest error in the requested format
fn report_failure(err: &HarvestError, format: &OutputFormat) {
    if *format == OutputFormat::Json {
        println!("{}", output::format_error_as_json(err));
        return;
    }

    eprintln!("{} {} ({})", style("✗").red().bold(), err, err.category());
    eprintln!("   {}", err.diagnostic());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet, cli.log_json);

    let mut config = Config::load().await?;
    config.apply_env(cli.youtube_api_key.clone(), cli.transcript_api_key.clone());

    match cli.command {
        Commands::Extract {
            channel,
            limit,
            output,
            format,
        } => {
            let outcome = async {
                let request = HarvestRequest::new(channel, Some(limit.unwrap_or(config.app.default_limit)))?;
                let pipeline = ShortsPipeline::from_config(&config)?.with_progress(!cli.quiet);

                tracing::info!("Starting extraction for channel: {}", request.channel_reference);
                pipeline.run(&request).await
            }
            .await;

            let report = match outcome {
                Ok(report) => report,
                Err(err) => {
                    report_failure(&err, &format);
                    std::process::exit(1);
                }
            };

            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(utils::default_export_filename(format.extension()))
                    } else {
                        path
                    };
                    output::save_to_file(&report, &path, &format).await?;
                    println!(
                        "Saved {} shorts ({} found) to: {}",
                        report.shorts.len(),
                        report.total_shorts_found,
                        path.display()
                    );
                }
                None => {
                    output::print_to_console(&report, &format)?;
                }
            }
        }
        Commands::Check => {
            let api_key = match config.youtube_api_key() {
                Ok(key) => key,
                Err(err) => {
                    report_failure(&err, &OutputFormat::Text);
                    std::process::exit(1);
                }
            };
            println!("Testing YouTube API (key {})", utils::mask_key(api_key, 10));

            let client = YoutubeDataClient::new(api_key, &config.youtube.base_url, config.request_timeout())?;
            let mut failed = false;
            for (step, result) in client.check_connectivity().await {
                match result {
                    Ok(note) => println!("  {} {}: {}", style("✓").green(), step, note),
                    Err(err) => {
                        failed = true;
                        println!("  {} {}: {}", style("✗").red(), step, err.diagnostic());
                    }
                }
            }

            if failed {
                std::process::exit(1);
            }
            println!("All YouTube API tests passed!");
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.interactive_setup().await?;
            }
        }
    }

    Ok(())
}
