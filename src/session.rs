//! Interactive session mode: one connection, one query per line of input,
//! terminated only by the interrupt signal.
//!
//! The loop is a single event-handling context that owns the connection
//! and an explicit end-of-input flag; line buffering over standard input
//! is a plain buffered reader, not a line editor.

use crate::config::Config;
use crate::core::db::{self, Db};
use crate::core::Result;
use crossterm::style::Stylize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Runs the session mode. Startup connection failures terminate the
/// process; per-line query failures are reported and the session keeps
/// going. The interrupt closes the connection exactly once.
pub async fn run_session(config: &Config) -> Result<()> {
    let db = Db::connect(config).await?;
    println!("{}", "Connection successful".green());

    let outcome = event_loop(&db, config).await;
    db.close().await;
    if outcome.is_ok() {
        println!("{}", "bye bye".green());
    }
    outcome
}

async fn event_loop(db: &Db, config: &Config) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    // A single pinned signal future keeps its registration alive across
    // iterations, so an interrupt arriving mid-query is picked up on the
    // next turn of the loop rather than lost. The in-flight query is never
    // cancelled; the interrupt only prevents future ones.
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            signal = &mut interrupt => {
                signal?;
                debug!("interrupt received");
                return Ok(());
            }
            line = lines.next_line(), if input_open => match line? {
                None => {
                    // Input exhausted; stay connected until interrupted.
                    debug!("end of input");
                    input_open = false;
                }
                Some(line) if line.is_empty() => {}
                Some(line) => run_line(db, &line, &config.params).await,
            }
        }
    }
}

/// Executes one input line as a query with the shared parameter list. A
/// line yields either a JSON result or a reported error, never both; the
/// session continues either way.
async fn run_line(db: &Db, line: &str, params: &[String]) {
    match execute_and_render(db, line, params).await {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("{e}"),
    }
}

async fn execute_and_render(db: &Db, line: &str, params: &[String]) -> Result<String> {
    let rows = db::execute(db.client(), line, params).await?;
    db::render(&rows)
}
