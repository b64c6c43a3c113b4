use crate::config::Config;
use crate::dashboard::{Dashboard, Snapshot};
use crate::seed;
use crate::types::{now_unix_ms, ThreatEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write as _;

const RECENT_THREATS_SHOWN: usize = 5;

pub enum ConsoleAction {
  RunLive { scan_on_start: bool },
  ExitOk,
}

const COMMAND_FLAGS: &[&str] = &["--help", "-h", "--snapshot", "--rules", "--simulate"];

pub fn wants_live(args: &[String]) -> bool {
  !args.iter().any(|a| COMMAND_FLAGS.contains(&a.as_str()))
}

pub fn run_console_command(cfg: &Config, args: &[String]) -> anyhow::Result<ConsoleAction> {
  if args.iter().any(|a| a == "--help" || a == "-h") {
    print_help();
    return Ok(ConsoleAction::ExitOk);
  }

  if args.iter().any(|a| a == "--snapshot") {
    return run_snapshot(cfg);
  }

  if args.iter().any(|a| a == "--rules") {
    return run_rules();
  }

  if let Some(i) = args.iter().position(|a| a == "--simulate") {
    return run_simulate(cfg, &args[i + 1..]);
  }

  Ok(ConsoleAction::RunLive {
    scan_on_start: args.iter().any(|a| a == "--scan"),
  })
}

fn run_snapshot(cfg: &Config) -> anyhow::Result<ConsoleAction> {
  let dashboard = Dashboard::new(cfg.simulation.clone(), now_unix_ms());
  println!("{}", serde_json::to_string_pretty(&dashboard.snapshot())?);
  Ok(ConsoleAction::ExitOk)
}

fn run_rules() -> anyhow::Result<ConsoleAction> {
  let rules = seed::automation_rules();
  println!("Automation rules ({}; not evaluated against events):", rules.len());
  for r in rules {
    let severities: Vec<_> = r.triggers.severity.iter().map(|s| s.as_str()).collect();
    let categories: Vec<_> = r.triggers.categories.iter().map(|c| c.as_str()).collect();
    println!(
      "- {} [{}] {}",
      r.id,
      if r.enabled { "enabled" } else { "disabled" },
      r.name
    );
    println!("    {}", r.description);
    println!(
      "    triggers: severity={} categories={}",
      severities.join(","),
      categories.join(",")
    );
    println!("    actions: {}", r.actions.names().join(","));
  }
  Ok(ConsoleAction::ExitOk)
}

fn run_simulate(cfg: &Config, tail: &[String]) -> anyhow::Result<ConsoleAction> {
  let ticks = tail
    .first()
    .and_then(|s| s.parse::<u64>().ok())
    .ok_or_else(|| anyhow::anyhow!("expected: --simulate <ticks> [--seed N]"))?;
  let seed = parse_u64_flag(tail, "--seed");

  let now = now_unix_ms();
  let mut dashboard = match seed {
    Some(s) => Dashboard::with_rng(cfg.simulation.clone(), now, StdRng::seed_from_u64(s)),
    None => Dashboard::new(cfg.simulation.clone(), now),
  };

  let detected_before = dashboard.metrics().threats_detected;
  dashboard.mount();
  dashboard.advance(cfg.simulation.tick_period().saturating_mul(saturating_u32(ticks)));
  dashboard.unmount();

  tracing::info!(
    ticks,
    emitted = dashboard.metrics().threats_detected - detected_before,
    "simulation finished"
  );

  print!("{}", render(&dashboard.snapshot()));
  Ok(ConsoleAction::ExitOk)
}

pub fn render(snap: &Snapshot) -> String {
  let mut out = String::new();
  let m = &snap.metrics;
  let s = &snap.status;

  let _ = writeln!(
    out,
    "Saviour Security  |  System {}  |  {}",
    s.overall.as_str().to_ascii_uppercase(),
    if snap.scanning { "Scanning..." } else { "Idle" }
  );
  let _ = writeln!(out, "Time: {}", format_clock(snap.now_unix_ms));
  let _ = writeln!(out);
  let _ = writeln!(
    out,
    "Active threats: {} ({} high severity)",
    snap.active_threats, snap.high_severity_threats
  );
  let _ = writeln!(out, "Threats detected: {}", m.threats_detected);
  let _ = writeln!(out, "Threats mitigated: {}", m.threats_mitigated);
  let _ = writeln!(out, "Threats blocked: {}", m.threats_blocked);
  let _ = writeln!(out, "Risk score: {:.0}/100", m.risk_score);
  let _ = writeln!(out, "Last scan: {}", format_clock(m.last_scan_unix_ms));
  let _ = writeln!(out);

  let _ = writeln!(out, "Recent threats:");
  for t in snap.threats.iter().take(RECENT_THREATS_SHOWN) {
    let _ = writeln!(out, "  {}", threat_line(t));
  }
  let _ = writeln!(out);

  let distribution: Vec<_> = snap
    .severity_distribution
    .iter()
    .map(|c| format!("{}: {}", c.name, c.count))
    .collect();
  let _ = writeln!(out, "Severity: {}", distribution.join("  "));

  let timeline: Vec<_> = snap
    .timeline
    .iter()
    .filter(|b| b.threats > 0)
    .map(|b| format!("{}h={}", b.label, b.threats))
    .collect();
  let _ = writeln!(out, "Timeline: {}", timeline.join(" "));
  let _ = writeln!(out);

  let on_off = |b: bool| if b { "Active" } else { "Disabled" };
  let _ = writeln!(
    out,
    "Firewall: {}  Antivirus: {}  Real-time protection: {}",
    on_off(s.firewall),
    on_off(s.antivirus),
    on_off(s.real_time_protection)
  );
  let _ = writeln!(
    out,
    "Connected devices: {}  Last update: {}",
    s.connected_devices,
    format_clock(s.last_update_unix_ms)
  );

  out
}

fn threat_line(t: &ThreatEvent) -> String {
  let mut line = format!(
    "{} [{}/{}] {} ({} -> {})",
    format_clock(t.timestamp_unix_ms),
    t.severity.as_str(),
    t.status.as_str(),
    t.title,
    t.source,
    t.target
  );
  if let Some(loc) = &t.location {
    let _ = write!(line, " from {}", loc.country);
  }
  if let Some(action) = &t.action_taken {
    let _ = write!(line, "; {action}");
  }
  line
}

pub fn format_clock(unix_ms: u64) -> String {
  let secs = unix_ms / 1000;
  format!(
    "{:02}:{:02}:{:02} UTC",
    (secs / 3600) % 24,
    (secs / 60) % 60,
    secs % 60
  )
}

fn parse_u64_flag(args: &[String], flag: &str) -> Option<u64> {
  let i = args.iter().position(|a| a == flag)?;
  args.get(i + 1).and_then(|s| s.parse::<u64>().ok())
}

fn saturating_u32(v: u64) -> u32 {
  u32::try_from(v).unwrap_or(u32::MAX)
}

fn print_help() {
  println!("Saviour v{} (console mode)", env!("CARGO_PKG_VERSION"));
  println!("Commands:");
  println!("  (no flags)                 live dashboard; Ctrl+C to exit");
  println!("  --scan                     start a scan when the live dashboard opens");
  println!("  --snapshot                 print the initial dashboard state as JSON");
  println!("  --rules                    list automation rules");
  println!("  --simulate <ticks> [--seed N]");
  println!("  --version");
  println!("Environment:");
  println!("  SAVIOUR_HOME               base directory for config.toml and logs");
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SimulationConfig;

  fn args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn live_unless_a_command_is_given() {
    assert!(wants_live(&args(&["saviour"])));
    assert!(wants_live(&args(&["saviour", "--scan"])));
    assert!(!wants_live(&args(&["saviour", "--simulate", "5"])));
    assert!(!wants_live(&args(&["saviour", "--rules"])));
  }

  #[test]
  fn simulate_requires_tick_count() {
    let cfg = Config::default();
    assert!(run_console_command(&cfg, &args(&["saviour", "--simulate"])).is_err());
    assert!(run_console_command(&cfg, &args(&["saviour", "--simulate", "x"])).is_err());
  }

  #[test]
  fn scan_flag_selects_live_scan() {
    let cfg = Config::default();
    match run_console_command(&cfg, &args(&["saviour", "--scan"])).unwrap() {
      ConsoleAction::RunLive { scan_on_start } => assert!(scan_on_start),
      ConsoleAction::ExitOk => panic!("expected live mode"),
    }
  }

  #[test]
  fn seed_flag_parses() {
    assert_eq!(parse_u64_flag(&args(&["3", "--seed", "42"]), "--seed"), Some(42));
    assert_eq!(parse_u64_flag(&args(&["3", "--seed"]), "--seed"), None);
  }

  #[test]
  fn clock_formats_utc() {
    assert_eq!(format_clock(1_700_000_000_000), "22:13:20 UTC");
    assert_eq!(format_clock(0), "00:00:00 UTC");
  }

  #[test]
  fn render_shows_counters_and_recent_threats() {
    let d = Dashboard::with_rng(
      SimulationConfig::default(),
      1_700_000_000_000,
      StdRng::seed_from_u64(1),
    );
    let text = render(&d.snapshot());
    assert!(text.contains("System WARNING"));
    assert!(text.contains("Active threats: 1 (2 high severity)"));
    assert!(text.contains("Threats detected: 247"));
    assert!(text.contains("Risk score: 15/100"));
    assert!(text.contains("Ransomware Detection"));
    assert!(text.contains("Severity: Low: 1  Medium: 2  High: 2"));
    assert!(text.contains("Timeline: 21h=3 22h=2"));
  }
}
