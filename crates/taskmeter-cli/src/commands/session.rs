//! Interactive session driven from stdin.
//!
//! Runs on a current-thread runtime: stdin lines and the tick driver are the
//! only two event sources and every state change happens on this thread.

use std::io::{IsTerminal, Write};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use taskmeter_core::format::{format_currency, format_projection};
use taskmeter_core::{Config, Event, Session, TickDriver};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

const HELP: &str = "\
commands:
  list | status        show timers, totals and projection
  toggle <id> | t <id> start or pause a timer
  stop                 stop all timers and compute earnings
  years <n>            set projection years
  rate <pct>           set daily interest in percent
  project              project the current earnings
  help                 show this text
  quit | q             leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Status,
    Toggle(u32),
    Stop,
    Years(u32),
    Rate(Decimal),
    Project,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let cmd = words.next().ok_or_else(|| "empty command".to_string())?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments for '{cmd}'"));
        }
        let required = |what: &str| arg.ok_or_else(|| format!("'{cmd}' needs {what}"));

        match cmd.to_ascii_lowercase().as_str() {
            "list" | "status" | "ls" => Ok(Self::Status),
            "toggle" | "t" => required("a task id")?
                .parse()
                .map(Self::Toggle)
                .map_err(|_| format!("invalid task id '{}'", arg.unwrap_or_default())),
            "stop" => Ok(Self::Stop),
            "years" => required("a number of years")?
                .parse()
                .map(Self::Years)
                .map_err(|_| format!("invalid years '{}'", arg.unwrap_or_default())),
            "rate" => required("a percentage")?
                .parse()
                .map(Self::Rate)
                .map_err(|_| format!("invalid rate '{}'", arg.unwrap_or_default())),
            "project" => Ok(Self::Project),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

struct Console {
    json: bool,
    live: bool,
    config: Config,
}

impl Console {
    fn event(&self, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
        }
        Ok(())
    }

    fn text(&self, text: &str) {
        if !self.json {
            if self.live {
                // Clear the live clock line first.
                print!("\r\x1b[2K");
            }
            println!("{text}");
        }
    }

    fn live_line(&self, session: &Session) -> std::io::Result<()> {
        if self.json || !self.live {
            return Ok(());
        }
        let mut out = std::io::stdout().lock();
        write!(out, "\r\x1b[2K{}", render::running_line(session))?;
        out.flush()
    }

    fn status(&self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            return self.event(&session.snapshot());
        }
        self.text(render::status(session, &self.config.currency).trim_end());
        Ok(())
    }
}

/// Returns `false` when the session should end.
fn handle(
    command: SessionCommand,
    session: &mut Session,
    console: &Console,
) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        SessionCommand::Status => console.status(session)?,
        SessionCommand::Toggle(id) => match session.toggle(id) {
            Some(event) => {
                console.event(&event)?;
                if let Some(timer) = session.timers().get(id) {
                    console.text(&render::timer_line(timer));
                }
            }
            None => tracing::debug!(id, "toggle for unknown timer ignored"),
        },
        SessionCommand::Stop => {
            if !session.can_stop_all() {
                console.text("nothing to stop");
                return Ok(true);
            }
            let total = match session.stop_all_and_compute_earnings() {
                Ok(total) => total,
                Err(e) => {
                    tracing::warn!(error = %e, "earnings not computed");
                    eprintln!("error: {e}");
                    return Ok(true);
                }
            };
            if let Some(event) = session.earnings_event() {
                console.event(&event)?;
            }
            console.text(&format!(
                "Total Earnings From This Session: {}",
                format_currency(total, &console.config.currency)
            ));
        }
        SessionCommand::Years(years) => {
            session.set_years(years);
            console.text(&format!("years = {years}"));
        }
        SessionCommand::Rate(pct) => {
            session.set_daily_rate_pct(pct);
            console.text(&format!("daily rate = {}%", pct.normalize()));
        }
        SessionCommand::Project => match session.project() {
            Some(event) => {
                console.event(&event)?;
                if let Some(record) = session.projection() {
                    console.text(&render::projection_caption(record));
                    console.text(&format_projection(&record.outcome, &console.config.currency));
                }
            }
            None => tracing::debug!("projection skipped, no positive earnings"),
        },
        SessionCommand::Help => console.text(HELP),
        SessionCommand::Quit => return Ok(false),
    }
    Ok(true)
}

async fn event_loop(
    session: &mut Session,
    console: &Console,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut driver = TickDriver::new(Duration::from_millis(console.config.timer.tick_interval_ms));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<SessionCommand>() {
                    Ok(command) => {
                        if !handle(command, session, console)? {
                            break;
                        }
                    }
                    Err(message) => eprintln!("{message}"),
                }
            }
            _ = driver.next() => {
                for event in session.tick() {
                    console.event(&event)?;
                    if let Event::TimerAutoStopped { id, .. } = event {
                        console.text(&format!("timer {id} reached 00:00"));
                    }
                }
                console.live_line(session)?;
            }
        }
        driver.sync(session.timers().any_running());
    }

    console.text("");
    Ok(())
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut session = Session::from_config(&config);
    let console = Console {
        json,
        live: std::io::stdout().is_terminal(),
        config,
    };

    if !json {
        console.text(HELP);
    }
    console.status(&session)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(event_loop(&mut session, &console))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!("toggle 3".parse(), Ok(SessionCommand::Toggle(3)));
        assert_eq!("t 1".parse(), Ok(SessionCommand::Toggle(1)));
        assert_eq!("STOP".parse(), Ok(SessionCommand::Stop));
        assert_eq!("years 15".parse(), Ok(SessionCommand::Years(15)));
        assert_eq!(
            "rate 0.25".parse(),
            Ok(SessionCommand::Rate(Decimal::new(25, 2)))
        );
        assert_eq!("q".parse(), Ok(SessionCommand::Quit));
        assert_eq!("  list  ".parse(), Ok(SessionCommand::Status));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!("toggle".parse::<SessionCommand>().is_err());
        assert!("toggle abc".parse::<SessionCommand>().is_err());
        assert!("years -1".parse::<SessionCommand>().is_err());
        assert!("years 1.5".parse::<SessionCommand>().is_err());
        assert!("rate lots".parse::<SessionCommand>().is_err());
        assert!("stop now".parse::<SessionCommand>().is_err());
        assert!("dance".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn negative_rate_passes_through() {
        assert_eq!(
            "rate -0.1".parse(),
            Ok(SessionCommand::Rate(Decimal::new(-1, 1)))
        );
    }

    #[test]
    fn handle_runs_full_flow() {
        let config = Config::default();
        let mut session = Session::from_config(&config);
        let console = Console {
            json: true,
            live: false,
            config,
        };
        assert!(handle(SessionCommand::Toggle(1), &mut session, &console).unwrap());
        for _ in 0..600 {
            session.tick();
        }
        assert!(handle(SessionCommand::Stop, &mut session, &console).unwrap());
        assert!(handle(SessionCommand::Years(1), &mut session, &console).unwrap());
        assert!(handle(SessionCommand::Project, &mut session, &console).unwrap());
        let record = session.projection().unwrap();
        assert_eq!(record.outcome.as_ref().unwrap().digits(), "103493055");
        assert!(!handle(SessionCommand::Quit, &mut session, &console).unwrap());
    }

    #[test]
    fn earnings_overflow_keeps_session_alive() {
        let config = Config::default();
        let mut session = Session::new(&config.tasks, u64::MAX, Decimal::MAX);
        let console = Console {
            json: true,
            live: false,
            config,
        };
        session.record_elapsed(1, u64::MAX);
        assert!(handle(SessionCommand::Toggle(2), &mut session, &console).unwrap());
        assert!(handle(SessionCommand::Stop, &mut session, &console).unwrap());
        assert!(session.total_earnings().is_none());
        assert!(!session.timers().any_running());
    }
}
