// SPDX-License-Identifier: MPL-2.0
//! Command-line parsing.

use super::Flags;
use crate::domain::handoff;
use crate::domain::{Color, ConfigOption, Hardware, Material};
use crate::error::{Error, Result};
use crate::logging;
use pico_args::Arguments;
use tracing::level_filters::LevelFilter;

pub const USAGE: &str = "\
Usage: backpack_configurator [OPTIONS] [HANDOFF_URL]

Options:
  --lang <LOCALE>         Interface language (en-US, uk)
  --config-dir <DIR>      Directory holding settings.toml
  --assets <DIR>          Directory holding the model and textures
  --user-agent <AGENT>    Pick the AR presentation from a user agent string
  --log-level <LEVEL>     error, warn, info, debug, trace or off
  --material <NAME>       denim, fabric or leather
  --color <NAME>          brown, black or darkblue
  --hardware <NAME>       silver, black or gold
  -h, --help              Print this help
";

/// What the command line asked for.
#[derive(Debug)]
pub enum Command {
    Help,
    Run { flags: Flags, log_level: LevelFilter },
}

fn argument_error(err: pico_args::Error) -> Error {
    Error::InvalidOption {
        field: "argument",
        value: err.to_string(),
    }
}

fn option<T: ConfigOption>(args: &mut Arguments, name: &'static str) -> Result<Option<T>> {
    args.opt_value_from_fn(name, T::parse).map_err(argument_error)
}

/// Parses the process arguments.
pub fn parse(mut args: Arguments) -> Result<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    let log_level = args
        .opt_value_from_str::<_, String>("--log-level")
        .map_err(argument_error)?
        .map(|raw| logging::parse_level(&raw))
        .transpose()?
        .unwrap_or(logging::DEFAULT_LEVEL);

    let mut flags = Flags {
        lang: args.opt_value_from_str("--lang").map_err(argument_error)?,
        config_dir: args.opt_value_from_str("--config-dir").map_err(argument_error)?,
        assets_dir: args.opt_value_from_str("--assets").map_err(argument_error)?,
        user_agent: args.opt_value_from_str("--user-agent").map_err(argument_error)?,
        material: option::<Material>(&mut args, "--material")?,
        color: option::<Color>(&mut args, "--color")?,
        hardware: option::<Hardware>(&mut args, "--hardware")?,
        handoff: None,
    };

    let mut rest = args.finish().into_iter();
    if let Some(raw) = rest.next() {
        let url = raw
            .into_string()
            .map_err(|raw| Error::Handoff(format!("not valid UTF-8: {raw:?}")))?;
        flags.handoff = Some(handoff::parse(&url)?);
    }
    if let Some(extra) = rest.next() {
        return Err(Error::InvalidOption {
            field: "argument",
            value: extra.to_string_lossy().into_owned(),
        });
    }

    Ok(Command::Run { flags, log_level })
}
