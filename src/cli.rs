use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use crate::archive::{Archive, open_source};
use crate::config::Config;
use crate::decode::{BatchPolicy, DecodeReport};
use crate::error::ArchiveError;
use crate::render::render_message;
use crate::slack::{ChannelInfo, DateKey};
use crate::utils::resolve_channel;

#[derive(Parser, Debug)]
#[command(name = "slack-archive")]
#[command(version)]
#[command(about = "Browse a statically exported Slack archive", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "ARCHIVE_CONFIG")]
    pub config: Option<String>,

    /// Archive directory or http(s) base URL, overrides archive.root
    #[arg(short, long)]
    pub archive: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the channels of the archive
    Channels,

    /// List the archived days of a channel
    Days {
        /// Channel name, #name, ID or partial name
        channel: String,
    },

    /// Show the messages of one day
    Show {
        /// Channel name, #name, ID or partial name
        channel: String,

        /// Day as YYYY/MM/DD or YYYY-MM-DD
        date: DateKey,

        /// Print decoded messages as JSON
        #[arg(long)]
        json: bool,

        /// Skip undecodable records instead of failing the day
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Decode every day and report records that fail
    Check {
        /// Limit the check to one channel
        channel: Option<String>,
    },
}

pub async fn run(cli: Cli, mut config: Config) -> Result<ExitCode> {
    if let Some(root) = cli.archive {
        config.archive.root = root;
    }
    if let Commands::Show {
        skip_invalid: true, ..
    } = cli.command
    {
        config.decode.policy = BatchPolicy::Skip;
    }

    match cli.command {
        Commands::Channels => {
            let archive = open_archive(&config, config.decode.policy)?;
            list_channels(&archive).await
        }
        Commands::Days { channel } => {
            let archive = open_archive(&config, config.decode.policy)?;
            list_days(&archive, &channel).await
        }
        Commands::Show {
            channel,
            date,
            json,
            ..
        } => {
            let archive = open_archive(&config, config.decode.policy)?;
            show_day(&archive, &channel, date, json).await
        }
        Commands::Check { channel } => {
            // Every bad record is listed, so records are skipped rather than aborting the day
            let archive = open_archive(&config, BatchPolicy::Skip)?;
            check(&archive, channel.as_deref()).await
        }
    }
}

fn open_archive(config: &Config, policy: BatchPolicy) -> Result<Archive> {
    let source = open_source(config).context("Failed to open archive")?;
    Ok(Archive::new(
        Arc::from(source),
        config.decode.options(),
        policy,
        config.archive.cache_days,
    ))
}

async fn find_channel(archive: &Archive, identifier: &str) -> Result<ChannelInfo> {
    let channels = archive.channels().await.context("Failed to load channels")?;
    Ok(resolve_channel(identifier, &channels)?.clone())
}

async fn list_channels(archive: &Archive) -> Result<ExitCode> {
    let channels = archive.channels().await.context("Failed to load channels")?;

    println!("Channels in {}", archive.describe());
    println!("================================");
    for channel in &channels {
        let archived = if channel.is_archived { " (archived)" } else { "" };
        match channel.topic() {
            Some(topic) => println!("#{}{}  {}", channel.name, archived, topic),
            None => println!("#{}{}", channel.name, archived),
        }
    }
    println!();
    println!("Total channels: {}", channels.len());

    Ok(ExitCode::SUCCESS)
}

async fn list_days(archive: &Archive, identifier: &str) -> Result<ExitCode> {
    let channel = find_channel(archive, identifier).await?;
    let days = archive
        .days(&channel.name)
        .await
        .with_context(|| format!("Failed to load days of #{}", channel.name))?;

    for day in &days {
        println!("{}", day);
    }
    info!("#{}: {} days", channel.name, days.len());

    Ok(ExitCode::SUCCESS)
}

async fn show_day(
    archive: &Archive,
    identifier: &str,
    date: DateKey,
    as_json: bool,
) -> Result<ExitCode> {
    let channel = find_channel(archive, identifier).await?;
    let report = archive.day(&channel.name, date).await?;

    report_skipped(&channel.name, date, &report);

    if as_json {
        let skipped: Vec<_> = report
            .skipped
            .iter()
            .map(|s| json!({"index": s.index, "error": s.error.to_string()}))
            .collect();
        let output = json!({
            "channel": channel.name,
            "date": date.to_string(),
            "messages": report.messages,
            "skipped": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("#{} {}", channel.name, date);
        println!("================================");
        for message in &report.messages {
            println!("{}", render_message(message));
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn check(archive: &Archive, identifier: Option<&str>) -> Result<ExitCode> {
    let channels = match identifier {
        Some(identifier) => vec![find_channel(archive, identifier).await?],
        None => archive.channels().await.context("Failed to load channels")?,
    };

    let mut days_checked = 0;
    let mut messages = 0;
    let mut failures = 0;

    for channel in &channels {
        let days = match archive.days(&channel.name).await {
            Ok(days) => days,
            Err(e) => {
                eprintln!("#{}: {}", channel.name, e);
                failures += 1;
                continue;
            }
        };

        for date in days {
            days_checked += 1;
            // Each day is read once, so the cache is bypassed
            match archive.load_day(&channel.name, date).await {
                Ok(report) => {
                    messages += report.messages.len();
                    failures += report.skipped.len();
                    report_skipped(&channel.name, date, &report);
                }
                Err(e @ ArchiveError::NotFound(_)) => {
                    eprintln!("#{} {}: listed in days.json but {}", channel.name, date, e);
                    failures += 1;
                }
                Err(e) => {
                    eprintln!("#{} {}: {}", channel.name, date, e);
                    failures += 1;
                }
            }
        }
    }

    println!(
        "Checked {} channels, {} days: {} messages decoded, {} failures",
        channels.len(),
        days_checked,
        messages,
        failures
    );

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn report_skipped(channel: &str, date: DateKey, report: &DecodeReport) {
    for skipped in &report.skipped {
        eprintln!(
            "#{} {}: skipped record {}: {}",
            channel, date, skipped.index, skipped.error
        );
    }
}
