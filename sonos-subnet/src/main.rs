use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sonos_state::logging::{init_logging, init_logging_from_env, LoggingMode};
use sonos_state::{Coordinator, NetworkTransport, SpeakerRef, TransportCommand};
use tracing::{info, warn};

mod config;
mod output;

use config::FileConfig;
use output::Format;

/// Control Sonos speakers that multicast discovery cannot reach
///
/// Speakers come from `--speaker`, `--subnet` and the config file. Every
/// command prints the resulting state, as text or as JSON with `--json`.
#[derive(Parser, Debug)]
#[command(name = "sonos-subnet", version, about)]
struct Cli {
    /// Config file (default: <config dir>/sonos-subnet/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Speaker address to control; repeatable
    #[arg(short, long = "speaker", global = true)]
    speakers: Vec<Ipv4Addr>,

    /// CIDR block to sweep for speakers before running the command; repeatable
    #[arg(long = "subnet", global = true)]
    subnets: Vec<String>,

    /// Seconds to wait for each probe
    #[arg(long, global = true)]
    probe_timeout: Option<u64>,

    /// Seconds to wait for each speaker poll
    #[arg(long, global = true)]
    poll_timeout: Option<u64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log output: silent, development, debug or json (default: SONOS_LOG_MODE)
    #[arg(long, global = true)]
    log: Option<LoggingMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Sweep a CIDR block and list the speakers found
    Scan {
        cidr: String,
        /// Probes in flight at once
        #[arg(long)]
        parallel: Option<usize>,
    },
    /// Check whether one address is a Sonos speaker
    Probe { address: Ipv4Addr },
    /// Poll every speaker once and print the groups
    Status,
    /// Keep polling and print every change
    Watch {
        /// Stop after this many snapshots
        #[arg(long)]
        cycles: Option<usize>,
        /// Seconds between polls
        #[arg(long)]
        interval: Option<u64>,
    },
    Play { target: String },
    Pause { target: String },
    Stop { target: String },
    Next { target: String },
    Previous { target: String },
    /// Set the volume (0-100)
    Volume {
        target: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },
    /// Add a speaker to another speaker's group
    Join { member: String, coordinator: String },
    /// Take a speaker out of its group
    Unjoin { member: String },
    /// Set or clear the sleep timer
    Sleep {
        target: String,
        #[arg(required_unless_present = "clear")]
        seconds: Option<u64>,
        #[arg(long, conflicts_with = "seconds")]
        clear: bool,
    },
    /// Play an http(s) audio URL
    PlayUri {
        target: String,
        uri: String,
        #[arg(long)]
        title: Option<String>,
    },
}

impl Commands {
    /// Commands that only make sense with speakers to talk to
    fn needs_speakers(&self) -> bool {
        !matches!(self, Commands::Scan { .. } | Commands::Probe { .. })
    }

    /// The speaker the command acts on, used to print its state afterwards
    fn target(&self) -> Option<&str> {
        match self {
            Commands::Play { target }
            | Commands::Pause { target }
            | Commands::Stop { target }
            | Commands::Next { target }
            | Commands::Previous { target }
            | Commands::Volume { target, .. }
            | Commands::Sleep { target, .. }
            | Commands::PlayUri { target, .. } => Some(target),
            Commands::Join { member, .. } | Commands::Unjoin { member } => Some(member),
            Commands::Scan { .. } | Commands::Probe { .. } | Commands::Status | Commands::Watch { .. } => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.log {
        Some(mode) => init_logging(mode),
        None => init_logging_from_env(),
    }
    .context("Failed to initialize logging")?;

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let format = Format::from_flag(cli.json);
    let file = FileConfig::load(cli.config.as_deref())?.merge(&cli.speakers, &cli.subnets);

    let mut config = file.coordinator.clone();
    if let Some(secs) = cli.probe_timeout {
        config.probe_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.poll_timeout {
        config.poll_timeout = Duration::from_secs(secs);
    }
    if let Commands::Watch { interval: Some(secs), .. } = cli.command {
        config.interval = Duration::from_secs(secs);
    }
    if let Commands::Scan { parallel: Some(parallel), .. } = cli.command {
        config.scan_parallelism = parallel;
    }
    let probe_timeout = config.probe_timeout;

    let coordinator = Coordinator::builder()
        .config(config)
        .speakers(if cli.command.needs_speakers() { file.speakers.clone() } else { Vec::new() })
        .build();

    match &cli.command {
        Commands::Scan { cidr, .. } => {
            let found = coordinator
                .scan_subnet(cidr, probe_timeout)
                .with_context(|| format!("Failed to scan {}", cidr))?;
            println!("{}", output::identities(&found, format)?);
            return Ok(());
        }
        Commands::Probe { address } => {
            let identity = coordinator
                .add_speaker(*address)
                .with_context(|| format!("Failed to probe {}", address))?;
            println!("{}", output::identities(&[identity], format)?);
            return Ok(());
        }
        _ => {}
    }

    for subnet in &file.subnets {
        match coordinator.scan_subnet(subnet, probe_timeout) {
            Ok(found) => info!(%subnet, found = found.len(), "subnet scanned"),
            Err(e) => warn!(%subnet, error = %e, "subnet scan failed"),
        }
    }
    if coordinator.speakers().is_empty() {
        bail!("No speakers available; pass --speaker or --subnet, or list them in the config file");
    }

    // learn the current groups before acting on them
    let snapshot = coordinator.refresh();

    match cli.command {
        Commands::Status => {
            println!("{}", output::snapshot(&snapshot, format)?);
            return Ok(());
        }
        Commands::Watch { cycles, .. } => return watch(&coordinator, cycles, format),
        _ => {}
    }

    execute(&coordinator, &cli.command)?;

    if let Some(target) = cli.command.target() {
        let address = coordinator.resolve(target)?;
        let snapshot = coordinator.snapshot();
        if let Some(view) = snapshot.get(address) {
            println!("{}", output::view(view, format)?);
        }
    }
    Ok(())
}

fn execute(coordinator: &Coordinator<NetworkTransport>, command: &Commands) -> Result<()> {
    let transport = |target: &str, action: TransportCommand| {
        coordinator
            .set_transport_state(SpeakerRef::from(target), action)
            .with_context(|| format!("Failed to {} {}", action.as_str(), target))
    };

    match command {
        Commands::Play { target } => transport(target.as_str(), TransportCommand::Play),
        Commands::Pause { target } => transport(target.as_str(), TransportCommand::Pause),
        Commands::Stop { target } => transport(target.as_str(), TransportCommand::Stop),
        Commands::Next { target } => transport(target.as_str(), TransportCommand::Next),
        Commands::Previous { target } => transport(target.as_str(), TransportCommand::Previous),
        Commands::Volume { target, level } => coordinator
            .set_volume(target.as_str(), *level)
            .with_context(|| format!("Failed to set volume on {}", target)),
        Commands::Join { member, coordinator: leader } => coordinator
            .join(member.as_str(), leader.as_str())
            .with_context(|| format!("Failed to join {} to {}", member, leader)),
        Commands::Unjoin { member } => coordinator
            .unjoin(member.as_str())
            .with_context(|| format!("Failed to unjoin {}", member)),
        Commands::Sleep { target, clear: true, .. } => coordinator
            .clear_sleep_timer(target.as_str())
            .with_context(|| format!("Failed to clear sleep timer on {}", target)),
        Commands::Sleep { target, seconds, .. } => {
            let seconds = (*seconds).context("Sleep needs a duration in seconds or --clear")?;
            coordinator
                .set_sleep_timer(target.as_str(), Duration::from_secs(seconds))
                .with_context(|| format!("Failed to set sleep timer on {}", target))
        }
        Commands::PlayUri { target, uri, title } => coordinator
            .play_uri(target.as_str(), uri, title.as_deref())
            .with_context(|| format!("Failed to play {} on {}", uri, target)),
        Commands::Scan { .. } | Commands::Probe { .. } | Commands::Status | Commands::Watch { .. } => Ok(()),
    }
}

fn watch(coordinator: &Coordinator<NetworkTransport>, cycles: Option<usize>, format: Format) -> Result<()> {
    let updates = coordinator.subscribe();
    println!("{}", output::snapshot(&coordinator.snapshot(), format)?);
    coordinator.start()?;

    let limit = cycles.unwrap_or(usize::MAX);
    for snapshot in updates.take(limit) {
        println!("{}", output::snapshot(&snapshot, format)?);
    }

    coordinator.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["sonos-subnet", "play", "kitchen"], Commands::Play { target: "kitchen".into() })]
    #[case(&["sonos-subnet", "volume", "192.168.2.30", "40"], Commands::Volume { target: "192.168.2.30".into(), level: 40 })]
    #[case(&["sonos-subnet", "join", "den", "media_player.kitchen"], Commands::Join { member: "den".into(), coordinator: "media_player.kitchen".into() })]
    #[case(&["sonos-subnet", "sleep", "den", "--clear"], Commands::Sleep { target: "den".into(), seconds: None, clear: true })]
    #[case(&["sonos-subnet", "watch", "--cycles", "3"], Commands::Watch { cycles: Some(3), interval: None })]
    fn test_parse_commands(#[case] args: &[&str], #[case] expected: Commands) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.command, expected);
    }

    #[rstest]
    #[case(&["sonos-subnet", "volume", "den", "101"])]
    #[case(&["sonos-subnet", "sleep", "den"])]
    #[case(&["sonos-subnet", "sleep", "den", "60", "--clear"])]
    #[case(&["sonos-subnet", "probe", "not-an-ip"])]
    fn test_rejects_bad_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "sonos-subnet",
            "status",
            "--speaker",
            "192.168.2.30",
            "-s",
            "192.168.2.31",
            "--subnet",
            "192.168.2.0/24",
            "--json",
            "--log",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.speakers.len(), 2);
        assert_eq!(cli.subnets, vec!["192.168.2.0/24".to_string()]);
        assert!(cli.json);
        assert_eq!(cli.log, Some(LoggingMode::Debug));
        assert!(cli.command.needs_speakers());
    }

    #[test]
    fn test_command_target() {
        let join = Commands::Join {
            member: "den".into(),
            coordinator: "kitchen".into(),
        };
        assert_eq!(join.target(), Some("den"));
        assert_eq!(Commands::Status.target(), None);
    }
}
