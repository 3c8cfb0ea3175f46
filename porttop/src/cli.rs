//! One-shot commands: list, kill, label edits, open.

use std::process::ExitCode;

use porttop_core::{CommandRunner, EnrichedPort, PortFilter, PortPipeline};

use crate::open::open_url;
use crate::ui::util::truncate_middle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { json: bool },
    Kill(u16),
    Tag(u16, String),
    Untag(u16),
    Labels,
    Open(u16),
}

pub async fn run<R: CommandRunner>(
    cmd: Command,
    pipeline: &PortPipeline<R>,
    filter: &PortFilter,
) -> anyhow::Result<ExitCode> {
    match cmd {
        Command::List { json } => {
            let snap = pipeline.snapshot().await;
            if let Some(err) = &snap.scan_error {
                eprintln!("error: {err}");
            }
            let shown: Vec<&EnrichedPort> = filter
                .apply(&snap.ports)
                .into_iter()
                .map(|i| &snap.ports[i])
                .collect();
            if json {
                println!("{}", render_json(&shown)?);
            } else {
                print!("{}", render_table(&shown));
            }
            Ok(if snap.scan_error.is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Kill(port) => match pipeline.terminate(port).await {
            Ok(pids) => {
                let list: Vec<String> = pids.iter().map(u32::to_string).collect();
                println!("killed port {port} (pid {})", list.join(", "));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("error: {e}");
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Tag(port, name) => set_label(pipeline, port, &name),
        Command::Untag(port) => set_label(pipeline, port, ""),
        Command::Labels => {
            for (port, name) in pipeline.labels().all() {
                println!("{port}\t{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Open(port) => {
            open_url(pipeline.runner(), &porttop_core::local_url(port)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn set_label<R: CommandRunner>(
    pipeline: &PortPipeline<R>,
    port: u16,
    name: &str,
) -> anyhow::Result<ExitCode> {
    if let Err(e) = pipeline.labels().set(port, name) {
        eprintln!("error: {e}");
        return Ok(ExitCode::FAILURE);
    }
    match pipeline.labels().get(port) {
        Some(label) => println!("port {port} labelled '{label}'"),
        None => println!("port {port} label cleared"),
    }
    Ok(ExitCode::SUCCESS)
}

/// Pretty JSON array; record fields sit at the top level of each entry.
pub fn render_json(ports: &[&EnrichedPort]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(ports)
}

pub fn render_table(ports: &[&EnrichedPort]) -> String {
    let mut out = format!(
        "{:<6} {:<8} {:<16} {:<20} {:<10} {:<10} {:<7} {:<12} {}\n",
        "PORT", "PID", "TYPE", "COMMAND", "USER", "MEMORY", "CPU", "UPTIME", "NAME"
    );
    for p in ports {
        out.push_str(&format!(
            "{:<6} {:<8} {:<16} {:<20} {:<10} {:<10} {:<7} {:<12} {}\n",
            p.port(),
            p.pid(),
            p.service_type,
            truncate_middle(&p.record.command, 20),
            truncate_middle(&p.record.user, 10),
            p.memory,
            p.cpu,
            p.uptime,
            p.custom_name.as_deref().unwrap_or("-"),
        ));
    }
    out
}
