//! Open a local port in the default browser via the platform opener.

use anyhow::{bail, Context};
use porttop_core::CommandRunner;

#[cfg(target_os = "macos")]
fn opener(url: &str) -> (&'static str, Vec<String>) {
    ("open", vec![url.to_string()])
}

#[cfg(windows)]
fn opener(url: &str) -> (&'static str, Vec<String>) {
    // empty title argument, otherwise `start` treats the url as the window title
    (
        "cmd",
        vec!["/C".into(), "start".into(), String::new(), url.to_string()],
    )
}

#[cfg(not(any(target_os = "macos", windows)))]
fn opener(url: &str) -> (&'static str, Vec<String>) {
    ("xdg-open", vec![url.to_string()])
}

pub async fn open_url<R: CommandRunner>(runner: &R, url: &str) -> anyhow::Result<()> {
    let (program, args) = opener(url);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let out = runner
        .run(program, &args)
        .await
        .with_context(|| format!("could not open {url}"))?;
    if !out.success() {
        bail!(
            "could not open {url}: {program} exited with status {:?} {}",
            out.code,
            out.stderr.trim()
        );
    }
    Ok(())
}
