//! Entry point for porttop. Parses args, then runs the TUI or a one-shot command.

mod app;
mod cli;
mod clipboard;
mod config;
mod logging;
mod open;
mod ui;

use std::{env, path::PathBuf, process::ExitCode};

use app::App;
use cli::Command;
use config::TuiConfig;
use porttop_core::{CoreConfig, PortFilter, PortPipeline};

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Help,
    Tui,
    Once(Command),
}

#[derive(Debug)]
struct ParsedArgs {
    mode: Mode,
    filter: Option<String>,
    auto_refresh: bool,
    labels_file: Option<PathBuf>,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--filter TEXT] [--no-auto-refresh] [--labels-file PATH]\n\
         \x20      {prog} --list|--json [--filter TEXT]\n\
         \x20      {prog} --kill PORT\n\
         \x20      {prog} --tag PORT NAME | --untag PORT | --labels\n\
         \x20      {prog} --open PORT\n\
         \x20      {prog} -h|--help"
    )
}

fn parse_port(prog: &str, flag: &str, v: Option<String>) -> Result<u16, String> {
    let v = v.ok_or_else(|| format!("{flag} needs a port\n{}", usage(prog)))?;
    match v.trim().parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(format!("{flag}: invalid port '{v}'\n{}", usage(prog))),
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "porttop".into());
    let mut command: Option<Command> = None;
    let mut help = false;
    let mut filter: Option<String> = None;
    let mut auto_refresh = true;
    let mut labels_file: Option<PathBuf> = None;

    let set = |cmd: Command, command: &mut Option<Command>| -> Result<(), String> {
        if command.is_some() {
            return Err(format!("only one command may be given\n{}", usage(&prog)));
        }
        *command = Some(cmd);
        Ok(())
    };

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => help = true,
            "--list" => set(Command::List { json: false }, &mut command)?,
            "--json" => set(Command::List { json: true }, &mut command)?,
            "--labels" => set(Command::Labels, &mut command)?,
            "--kill" => {
                let port = parse_port(&prog, "--kill", it.next())?;
                set(Command::Kill(port), &mut command)?;
            }
            "--untag" => {
                let port = parse_port(&prog, "--untag", it.next())?;
                set(Command::Untag(port), &mut command)?;
            }
            "--open" => {
                let port = parse_port(&prog, "--open", it.next())?;
                set(Command::Open(port), &mut command)?;
            }
            "--tag" => {
                let port = parse_port(&prog, "--tag", it.next())?;
                let name = it
                    .next()
                    .ok_or_else(|| format!("--tag needs a name\n{}", usage(&prog)))?;
                set(Command::Tag(port, name), &mut command)?;
            }
            "--filter" | "-f" => {
                filter = Some(
                    it.next()
                        .ok_or_else(|| format!("--filter needs a value\n{}", usage(&prog)))?,
                );
            }
            "--labels-file" => {
                labels_file = Some(
                    it.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| format!("--labels-file needs a path\n{}", usage(&prog)))?,
                );
            }
            "--no-auto-refresh" => auto_refresh = false,
            _ if arg.starts_with("--filter=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    filter = Some(v.to_string());
                }
            }
            _ => return Err(format!("Unexpected argument '{arg}'\n{}", usage(&prog))),
        }
    }

    let mode = if help {
        Mode::Help
    } else {
        command.map_or(Mode::Tui, Mode::Once)
    };
    Ok(ParsedArgs {
        mode,
        filter,
        auto_refresh,
        labels_file,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let prog = env::args().next().unwrap_or_else(|| "porttop".into());
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(ExitCode::from(2));
        }
    };

    if parsed.mode == Mode::Help {
        println!("{}", usage(&prog));
        return Ok(ExitCode::SUCCESS);
    }

    // subscriber first so config warnings are not dropped
    let log = match parsed.mode {
        Mode::Tui => logging::init_tui(),
        _ => {
            logging::init_cli();
            None
        }
    };

    let mut core = CoreConfig::from_env();
    if let Some(path) = parsed.labels_file {
        core.labels_path = path;
    }
    let filter = PortFilter::text(parsed.filter.unwrap_or_default());

    match parsed.mode {
        Mode::Help => Ok(ExitCode::SUCCESS),
        Mode::Once(cmd) => {
            let pipeline = PortPipeline::from_config(&core);
            cli::run(cmd, &pipeline, &filter).await
        }
        Mode::Tui => {
            tracing::info!(?log, labels = %core.labels_path.display(), "starting tui");
            let pipeline = PortPipeline::from_config(&core);
            let cfg = TuiConfig::from_env(parsed.auto_refresh);
            let mut app = App::new(pipeline, &cfg, filter);
            app.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
