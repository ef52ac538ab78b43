use std::{
    io,
    path::Path,
    process::{Command as StdCommand, Stdio},
    thread,
};

use crate::config::ViewerConfig;

const WINDOWS_START_ARGS: &[&str] = &["/C", "start", ""];
const NO_ARGS: &[&str] = &[];

/// Program and leading arguments used when no viewer command is configured.
fn platform_opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "windows") {
        ("cmd", WINDOWS_START_ARGS)
    } else if cfg!(target_os = "macos") {
        ("open", NO_ARGS)
    } else {
        ("xdg-open", NO_ARGS)
    }
}

pub fn build_command(config: &ViewerConfig, link_path: &Path) -> StdCommand {
    let mut cmd = match &config.command {
        Some(program) => {
            let mut cmd = StdCommand::new(program);
            cmd.args(&config.args);
            cmd
        }
        None => {
            let (program, args) = platform_opener();
            let mut cmd = StdCommand::new(program);
            cmd.args(args);
            cmd
        }
    };
    cmd.arg(link_path);
    cmd
}

/// Open the link descriptor in the globe viewer. The child is reaped on a
/// background thread; its exit status is only logged.
pub fn launch(config: &ViewerConfig, link_path: &Path) -> io::Result<()> {
    let mut cmd = build_command(config, link_path);
    log::info!("Launching globe viewer: {:?}", cmd);

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    log::info!("Globe viewer spawned (PID: {:?})", child.id());

    thread::spawn(move || match child.wait() {
        Ok(status) => log::debug!("Globe viewer launcher exited with {}", status),
        Err(e) => log::error!("Globe viewer wait error: {}", e),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::PathBuf;

    #[test]
    fn test_configured_command_gets_link_last() {
        let config = ViewerConfig {
            launch: true,
            command: Some("google-earth-pro".to_string()),
            args: vec!["--nosplash".to_string()],
        };
        let link = PathBuf::from("/tmp/globe-sync/NetworkLink.kml");

        let cmd = build_command(&config, &link);

        assert_eq!(cmd.get_program(), OsStr::new("google-earth-pro"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec![OsStr::new("--nosplash"), link.as_os_str()]);
    }

    #[test]
    fn test_default_uses_platform_opener() {
        let link = PathBuf::from("NetworkLink.kml");
        let cmd = build_command(&ViewerConfig::default(), &link);

        let (program, _) = platform_opener();
        assert_eq!(cmd.get_program(), OsStr::new(program));
        assert_eq!(cmd.get_args().last(), Some(link.as_os_str()));
    }

    #[test]
    fn test_missing_program_is_reported() {
        let config = ViewerConfig {
            launch: true,
            command: Some("/nonexistent/globe-viewer-binary".to_string()),
            args: Vec::new(),
        };
        assert!(launch(&config, Path::new("NetworkLink.kml")).is_err());
    }
}
