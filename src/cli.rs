use anyhow::{Result, anyhow, bail};
use std::path::PathBuf;

use crate::domain::value_objects::enums::simulation_channels::SimulationChannel;

pub const USAGE: &str = "usage: twin-link <command>

commands:
  upload <file>        upload a 3D model and print the asset id
  motor                stream motor RPM updates until ctrl-c
  arm                  stream robot arm positions until ctrl-c
  run <file>           execute a source file on the server and print its output
  viewer [asset_id]    print the globe viewer configuration as JSON";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload { path: PathBuf },
    Live { channel: SimulationChannel },
    Run { path: PathBuf },
    Viewer { asset_id: Option<String> },
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args.next().ok_or_else(|| anyhow!("missing command\n\n{}", USAGE))?;

        let command = match name.as_str() {
            "upload" => Command::Upload {
                path: required_path(args.next(), "upload")?,
            },
            "motor" | "arm" => Command::Live {
                channel: SimulationChannel::try_from(name.as_str())?,
            },
            "run" => Command::Run {
                path: required_path(args.next(), "run")?,
            },
            "viewer" => Command::Viewer {
                asset_id: args.next(),
            },
            other => bail!("unknown command: {}\n\n{}", other, USAGE),
        };

        if let Some(extra) = args.next() {
            bail!("unexpected argument: {}\n\n{}", extra, USAGE);
        }

        Ok(command)
    }
}

fn required_path(arg: Option<String>, command: &str) -> Result<PathBuf> {
    arg.map(PathBuf::from)
        .ok_or_else(|| anyhow!("{} needs a file argument\n\n{}", command, USAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        Command::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse(&["upload", "arm.glb"]).unwrap(),
            Command::Upload {
                path: PathBuf::from("arm.glb")
            }
        );
        assert_eq!(
            parse(&["motor"]).unwrap(),
            Command::Live {
                channel: SimulationChannel::Motor
            }
        );
        assert_eq!(
            parse(&["arm"]).unwrap(),
            Command::Live {
                channel: SimulationChannel::Arm
            }
        );
        assert_eq!(
            parse(&["run", "spin.py"]).unwrap(),
            Command::Run {
                path: PathBuf::from("spin.py")
            }
        );
        assert_eq!(
            parse(&["viewer", "96188"]).unwrap(),
            Command::Viewer {
                asset_id: Some("96188".to_string())
            }
        );
        assert_eq!(parse(&["viewer"]).unwrap(), Command::Viewer { asset_id: None });
    }

    #[test]
    fn rejects_bad_invocations() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["upload"]).is_err());
        assert!(parse(&["motor", "extra"]).is_err());
        assert!(parse(&["temperature"]).is_err());
    }
}
