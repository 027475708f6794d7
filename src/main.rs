//! portknob - port knocking daemon with web interface.
//!
//! Loads and validates the configuration, then holds it for the HTTP
//! listener and firewall manager, reloading on SIGHUP.

use anyhow::Context;
use portknob::telemetry::{self, Telemetry};
use portknob::{Config, ConfigHandle};
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "/etc/portknob.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (check_only, config_path) = match args.next() {
        Some(flag) if flag == "--check" => (true, args.next()),
        path => (false, path),
    };
    let config_path = config_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let telemetry = telemetry::init();

    // Nothing is bound and no firewall state is touched until the
    // configuration has been fully validated.
    let handle = match ConfigHandle::load(&config_path) {
        Ok(handle) => handle,
        Err(e) => {
            error!(path = %config_path, kind = e.kind(), error = %e, "Failed to load config");
            return Err(e).with_context(|| format!("invalid configuration in {config_path}"));
        }
    };

    let config = handle.current();
    telemetry.apply_verbosity(config.daemon.verbose);

    if check_only {
        info!(path = %config_path, "Configuration OK");
        return Ok(());
    }

    log_summary(&config);
    wait_for_signals(&handle, &telemetry).await
}

fn log_summary(config: &Config) {
    let d = &config.daemon;
    info!(
        listen = %d.listen,
        http_path = %d.http_path,
        chain = %d.firewall_chain_name,
        deny = %d.firewall_deny_method,
        cookie_lifespan_secs = d.cookie_lifespan.as_secs(),
        firewall_lifespan_secs = d.firewall_lifespan.as_secs(),
        rules = config.firewall.len(),
        secrets = config.secrets.len(),
        "Starting portknob"
    );
    for rule in &config.firewall {
        info!(
            comment = %rule.comment,
            proto = %rule.proto,
            dest = %rule.dest,
            dport = %rule.dport,
            redirected = rule.redir.is_some(),
            "Firewall rule"
        );
    }
    if config.secrets.is_empty() {
        warn!("No [secrets] configured; nobody will be able to authenticate");
    }
}

#[cfg(unix)]
async fn wait_for_signals(handle: &ConfigHandle, telemetry: &Telemetry) -> anyhow::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sighup =
        signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                info!("Shutting down");
                return Ok(());
            }
            _ = sighup.recv() => {
                info!(path = %handle.path().display(), "SIGHUP received, reloading configuration");
                match handle.reload() {
                    Ok(config) => {
                        telemetry.apply_verbosity(config.daemon.verbose);
                        log_summary(&config);
                    }
                    Err(e) => error!(
                        kind = e.kind(),
                        error = %e,
                        "Reload rejected; keeping previous configuration"
                    ),
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signals(_handle: &ConfigHandle, _telemetry: &Telemetry) -> anyhow::Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("Shutting down");
    Ok(())
}
