pub mod charts;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod generator;
pub mod live;
pub mod logging;
pub mod paths;
pub mod scheduler;
pub mod seed;
pub mod types;
pub mod window;

use std::sync::mpsc;
use std::time::Duration;

pub fn run_console(args: &[String]) -> anyhow::Result<()> {
  let base = paths::base_dir()?;
  let config_path = paths::config_path(&base);
  let cfg = config::load_or_create_default(&config_path)?;

  let logs = paths::logs_dir(&base);
  // The live view owns the terminal, so it only logs to file.
  logging::init(&logs, &cfg.logging, !console::wants_live(args))?;

  let scan_on_start = match console::run_console_command(&cfg, args)? {
    console::ConsoleAction::ExitOk => return Ok(()),
    console::ConsoleAction::RunLive { scan_on_start } => scan_on_start,
  };

  tracing::info!("starting Saviour dashboard (console mode)");
  let (stop_tx, stop_rx) = mpsc::channel::<()>();

  let ctrlc_tx = stop_tx.clone();
  ctrlc::set_handler(move || {
    let _ = ctrlc_tx.send(());
  })?;

  live::LiveDashboard::new(cfg).run(stop_rx, Duration::from_millis(500), scan_on_start)?;
  tracing::info!("dashboard stopped");
  Ok(())
}
