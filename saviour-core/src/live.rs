use crate::config::Config;
use crate::console;
use crate::dashboard::Dashboard;
use crate::types::now_unix_ms;
use std::sync::mpsc;
use std::time::Duration;

pub struct LiveDashboard {
  cfg: Config,
}

impl LiveDashboard {
  pub fn new(cfg: Config) -> Self {
    Self { cfg }
  }

  pub fn run(
    &self,
    stop_rx: mpsc::Receiver<()>,
    poll: Duration,
    scan_on_start: bool,
  ) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(self.cfg.simulation.clone(), now_unix_ms());
    dashboard.mount();

    tracing::info!(
      tick_seconds = self.cfg.simulation.tick_seconds,
      emit_probability = self.cfg.simulation.emit_probability,
      "live dashboard started"
    );

    if scan_on_start {
      dashboard.start_scan();
    }

    let mut rendered = None;
    loop {
      dashboard.advance_to(now_unix_ms());

      if rendered != Some(dashboard.revision()) {
        println!("{}", console::render(&dashboard.snapshot()));
        rendered = Some(dashboard.revision());
      }

      if stop_rx.recv_timeout(poll).is_ok() {
        break;
      }
    }

    dashboard.unmount();
    tracing::info!("live dashboard exiting");
    Ok(())
  }
}
