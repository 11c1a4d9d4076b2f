use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use lumen_store::{Connectivity, PendingWrite};

use crate::session::Session;
use crate::state::outbox_path;

/// Append pending writes to the JSONL hand-off file, one line per write.
pub fn sync(session: &mut Session, out: Option<PathBuf>, offline: bool) -> Result<()> {
    let path = outbox_path(&session.cfg, out)?;
    let ctx = Connectivity::from_flag(!(offline || session.cfg.sync.offline), Utc::now());

    let pending = session.store.outbox().len();
    if pending == 0 {
        println!("Nothing to sync.");
        return Ok(());
    }

    if !ctx.is_online() {
        println!("Offline: {pending} write(s) kept for later.");
        return Ok(());
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    let report = session.store.outbox_mut().flush(&ctx, |w: &PendingWrite| {
        let line = serde_json::to_string(w)?;
        writeln!(file, "{line}")?;
        Ok::<(), anyhow::Error>(())
    });
    session.save()?;

    info!(
        delivered = report.delivered,
        failed = report.failed,
        dropped = report.dropped,
        "outbox flushed"
    );
    println!(
        "Synced {} write(s) to {} ({} failed, {} dropped)",
        report.delivered,
        path.display(),
        report.failed,
        report.dropped
    );
    Ok(())
}
