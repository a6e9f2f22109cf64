use anyhow::Context;
use clap::Parser;
use generator::profile::{SweepGenerator, SweepProfile};
use generator::template::{template, TEMPLATE_NAMES};
use log::info;
use sonarcore::link::available_ports;
use sonarcore::SonarConfig;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;
use workflow::stream::stream_lines;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Emulates the sonar rangefinder and replays sweeps offline")]
struct Args {
    /// Replay a sweep through the sonar core with a synthetic clock and report the result
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Load the display/link config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Built-in scene for the emulated sensor
    #[arg(long, default_value = "default")]
    template: String,
    /// Number of lines to send; streaming runs until Ctrl+C when omitted
    #[arg(long)]
    lines: Option<usize>,
    /// Stream lines to this serial port (e.g. one end of a virtual null-modem pair)
    #[arg(long)]
    port: Option<String>,
    /// Stream lines to stdout
    #[arg(long, default_value_t = false)]
    stdout: bool,
    /// Where the offline report is appended
    #[arg(long, default_value = "tools/data/offline_sweep.log")]
    report: PathBuf,
    /// List serial ports and exit
    #[arg(long, default_value_t = false)]
    list_ports: bool,
}

fn resolve_profile(name: &str) -> anyhow::Result<SweepProfile> {
    template(name).with_context(|| {
        format!(
            "unknown template {name:?}; expected one of {}",
            TEMPLATE_NAMES.join(", ")
        )
    })
}

fn run_offline(config: WorkflowConfig, report_path: &Path) -> anyhow::Result<()> {
    let result = Runner::new(config).execute().context("replaying sweep")?;

    println!(
        "Offline run -> readings {}, targets {}, connects {}, faults {}, final angle {}",
        result.metrics.readings,
        result.detections.len(),
        result.metrics.connects,
        result.metrics.disconnects(),
        result.final_angle
    );

    let mut report = serde_json::to_string(&result).context("serializing offline report")?;
    report.push('\n');
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(report_path)
        .with_context(|| format!("opening report {}", report_path.display()))?;
    file.write_all(report.as_bytes())?;
    Ok(())
}

fn run_stream(
    profile: SweepProfile,
    sonar: &SonarConfig,
    port: Option<String>,
    to_stdout: bool,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let mut generator = SweepGenerator::new(profile);
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for line streaming")?;

    let sent = if let Some(port_name) = port {
        let mut serial = serialport::new(&port_name, sonar.link.baud)
            .timeout(Duration::from_millis(sonar.link.read_timeout_ms))
            .open()
            .with_context(|| format!("opening {port_name}"))?;
        info!("streaming to {} at {} baud", port_name, sonar.link.baud);
        runtime.block_on(stream_lines(&mut serial, &mut generator, limit))?
    } else if to_stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        runtime.block_on(stream_lines(&mut handle, &mut generator, limit))?
    } else {
        anyhow::bail!("nothing to do: pass --offline, --port <name> or --stdout");
    };

    info!("streamed {} lines", sent);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_ports {
        for port in available_ports().context("enumerating serial ports")? {
            println!("{port}");
        }
        return Ok(());
    }

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        let sonar = match args.config.as_ref() {
            Some(path) => SonarConfig::load(path)
                .with_context(|| format!("loading sonar config {}", path.display()))?,
            None => SonarConfig::default(),
        };
        let lines = args.lines.unwrap_or(WorkflowConfig::default().lines);
        WorkflowConfig::from_args(lines, resolve_profile(&args.template)?, sonar)
    };

    if args.offline {
        return run_offline(workflow_config, &args.report);
    }

    run_stream(
        workflow_config.profile,
        &workflow_config.sonar,
        args.port,
        args.stdout,
        args.lines,
    )
}
