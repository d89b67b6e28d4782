//! AuraBulb command-line tool
//!
//! Sends one command to a bulb and prints the reply, or runs a wake-up ramp.

mod config;
mod error;

use std::path::PathBuf;
use std::time::Duration;

use aurabulb_client::{AuraBulb, ClientConfig, StreamTransport, SystemClock, Transport, WakeupRamp};
use aurabulb_protocol::{AlarmTime, LightLevel, LightMode, LogObserver, Response, Rgb};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{parse_time_of_day, wakeup_window, FileConfig};
use crate::error::{CliError, CliResult};

/// AuraBulb command-line tool
#[derive(Parser, Debug)]
#[command(name = "aurabulb")]
#[command(about = "Control an AuraBulb over its Bluetooth serial link")]
#[command(version)]
struct Args {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device of the bound RFCOMM channel (e.g. /dev/rfcomm0)
    #[arg(short, long, conflicts_with = "tcp")]
    device: Option<PathBuf>,

    /// TCP bridge to the serial link (host:port)
    #[arg(short, long)]
    tcp: Option<String>,

    /// Read timeout for the TCP bridge in milliseconds
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Do not wait for the greeting after connecting
    #[arg(long)]
    no_greeting: bool,

    /// Unescape replies before checking them
    #[arg(long)]
    symmetric_unstuffing: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Toggle the light on or off
    Toggle,

    /// Read the light level, or set it (0-210)
    Level {
        /// New level
        value: Option<u8>,
    },

    /// Read the colour, or set it
    Color {
        /// Red, green and blue (0-255 each)
        #[arg(num_args = 3, value_names = ["RED", "GREEN", "BLUE"])]
        rgb: Option<Vec<u8>>,
    },

    /// Set the light mode (1-5)
    Mode {
        /// New mode
        value: u8,
    },

    /// Read the battery voltage
    Voltage,

    /// Set the bulb's clock to the local time
    SyncTime,

    /// Read the alarm, or set it with --at
    Alarm {
        /// Alarm time, HH:MM
        #[arg(long)]
        at: Option<String>,

        /// Scene played when the alarm fires
        #[arg(long, default_value = "1")]
        scene: u8,

        /// Store the alarm disarmed
        #[arg(long)]
        disable: bool,
    },

    /// Ramp the light up between two times of day
    Wakeup {
        /// Start of the ramp, HH:MM
        #[arg(long)]
        start: Option<String>,

        /// End of the ramp, HH:MM
        #[arg(long)]
        end: Option<String>,

        /// Final level (defaults to full brightness)
        #[arg(long)]
        max_level: Option<u8>,
    },
}

/// Where to reach the bulb, after merging flags and file.
enum Link {
    Device(PathBuf),
    Tcp {
        addr: String,
        read_timeout: Option<Duration>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> CliResult<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let client_config = ClientConfig {
        discard_greeting: file.client.discard_greeting && !args.no_greeting,
        symmetric_unstuffing: file.client.symmetric_unstuffing || args.symmetric_unstuffing,
    };
    let link = resolve_link(&args, &file)?;

    match link {
        Link::Device(path) => {
            tracing::info!("Opening {}", path.display());
            let transport = StreamTransport::open_device(&path).map_err(CliError::Connect)?;
            run_on(transport, &client_config, &args.command, &file)
        }
        Link::Tcp { addr, read_timeout } => {
            tracing::info!("Connecting to {}", addr);
            let transport = StreamTransport::connect_tcp(addr.as_str(), read_timeout)
                .map_err(CliError::Connect)?;
            run_on(transport, &client_config, &args.command, &file)
        }
    }
}

fn resolve_link(args: &Args, file: &FileConfig) -> CliResult<Link> {
    let read_timeout = args
        .read_timeout_ms
        .or(file.read_timeout_ms)
        .map(Duration::from_millis);

    if let Some(path) = &args.device {
        return Ok(Link::Device(path.clone()));
    }
    if let Some(addr) = &args.tcp {
        return Ok(Link::Tcp {
            addr: addr.clone(),
            read_timeout,
        });
    }
    if let Some(path) = &file.device {
        return Ok(Link::Device(path.clone()));
    }
    if let Some(addr) = &file.tcp {
        return Ok(Link::Tcp {
            addr: addr.clone(),
            read_timeout,
        });
    }
    Err(CliError::NoLink)
}

fn run_on<S>(
    transport: StreamTransport<S>,
    config: &ClientConfig,
    command: &Cmd,
    file: &FileConfig,
) -> CliResult<()>
where
    S: std::io::Read + std::io::Write,
{
    let mut transport = transport.with_unstuffing(config.unstuffing());
    if config.discard_greeting {
        transport.discard_greeting().map_err(CliError::Connect)?;
    }
    let mut bulb = AuraBulb::with_observer(transport, LogObserver, config.unstuffing());
    execute(&mut bulb, command, file)
}

fn execute<T: Transport>(
    bulb: &mut AuraBulb<T>,
    command: &Cmd,
    file: &FileConfig,
) -> CliResult<()> {
    match command {
        Cmd::Toggle => report(bulb.toggle_light()?),

        Cmd::Level { value: None } => print_value("level", bulb.get_light_level()?),

        Cmd::Level { value: Some(level) } => {
            report(bulb.set_light_level(LightLevel::new(*level)?)?)
        }

        Cmd::Color { rgb: None } => println!("{}", describe_color(bulb.get_light_color()?)),

        Cmd::Color { rgb: Some(rgb) } => {
            let color = Rgb::new(rgb[0], rgb[1], rgb[2]);
            report(bulb.set_light_color(color)?)
        }

        Cmd::Mode { value } => report(bulb.set_light_mode(LightMode::new(*value)?)?),

        Cmd::Voltage => print_value("voltage", bulb.get_voltage()?),

        Cmd::SyncTime => {
            let now = Local::now().naive_local();
            tracing::info!("Setting clock to {}", now);
            report(bulb.set_time(now)?)
        }

        Cmd::Alarm { at: None, .. } => match bulb.get_alarm_time()? {
            Some(alarm) => println!(
                "alarm: {:02}:{:02} scene {} {}",
                alarm.hour,
                alarm.minute,
                alarm.scene,
                if alarm.enabled { "enabled" } else { "disabled" }
            ),
            None => println!("alarm: no reply"),
        },

        Cmd::Alarm {
            at: Some(at),
            scene,
            disable,
        } => {
            let time = AlarmTime::from_naive_time(parse_time_of_day(at)?);
            report(bulb.set_alarm_time(time, *scene, !disable)?)
        }

        Cmd::Wakeup {
            start,
            end,
            max_level,
        } => {
            let window = file.wakeup.as_ref();
            let start = start
                .as_deref()
                .or(window.map(|w| w.start.as_str()))
                .ok_or(CliError::NoWakeupWindow)?;
            let end = end
                .as_deref()
                .or(window.map(|w| w.end.as_str()))
                .ok_or(CliError::NoWakeupWindow)?;

            let today = Local::now().date_naive();
            let (start, end) =
                wakeup_window(today, parse_time_of_day(start)?, parse_time_of_day(end)?);

            let mut ramp = WakeupRamp::new(start, end)?;
            if let Some(level) = max_level {
                ramp = ramp.with_max_level(LightLevel::new(*level)?);
            }
            tracing::info!("Wake-up from {} to {}", ramp.start(), ramp.end());
            let updates = ramp.run(bulb, &SystemClock)?;
            tracing::info!("Wake-up finished after {} updates", updates);
        }
    }
    Ok(())
}

fn print_value(name: &str, value: Option<u8>) {
    match value {
        Some(v) => println!("{}: {}", name, v),
        None => println!("{}: no reply", name),
    }
}

fn describe_color(data: Option<Vec<u8>>) -> String {
    match data {
        Some(data) => format!("colour: {}", hex::encode(data)),
        None => "colour: no reply".to_string(),
    }
}

fn report(response: Option<Response>) {
    match response {
        Some(response) => println!("ok: {:?}", response),
        None => println!("no valid reply"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_color() {
        assert_eq!(describe_color(Some(vec![0xff, 0x00, 0x10])), "colour: ff0010");
        assert_eq!(describe_color(None), "colour: no reply");
    }
}
