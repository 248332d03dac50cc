use std::io::{self, BufRead, Write};

use rolo_core::diff::Diff;
use rolo_core::icloud::{fetch_and_cache, RemoteSnapshot, SyncSession};
use rolo_core::reconcile::{reconcile, transform_remote_contacts, ReconcileReport, UpdateReviewer};
use rolo_core::{Contact, Group};

use crate::commands::common::{beside, bordered, Context};
use crate::error::CliError;

const PROMPT: &str = "Accept update? [Y/N]: ";

/// Asks on a terminal whether each remote change should be taken.
///
/// The current contact and the diff are printed side by side, each in a box.
pub struct TerminalReviewer<R, W> {
    input: R,
    output: W,
}

impl TerminalReviewer<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalReviewer<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn render(current: &Contact, diff: &Diff) -> rolo_core::Result<String> {
        let current = serde_json::to_string_pretty(current)?;
        let diff = serde_json::to_string_pretty(diff)?;
        Ok(beside(&bordered(&current), &bordered(&diff)))
    }
}

impl<R: BufRead, W: Write> UpdateReviewer for TerminalReviewer<R, W> {
    fn review(&mut self, current: &Contact, diff: &Diff) -> rolo_core::Result<bool> {
        writeln!(self.output, "{}", Self::render(current, diff)?)?;
        write!(self.output, "{PROMPT}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(rolo_core::Error::Aborted(
                "end of input while reviewing updates".to_string(),
            ));
        }
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

/// Reconcile `snapshot` into the local store and persist the result.
///
/// Nothing is written if any contact fails to transform or the reviewer aborts.
pub fn pull_contacts(
    ctx: &Context,
    snapshot: RemoteSnapshot,
    reviewer: &mut dyn UpdateReviewer,
) -> Result<ReconcileReport, CliError> {
    let store = ctx.store();
    let pulled = transform_remote_contacts(&snapshot.contacts, &ctx.ignored_uuids())?;
    let current = store.load_contacts()?;
    let report = reconcile(current, pulled, reviewer)?;

    let groups = snapshot.groups.iter().map(Group::from).collect::<Vec<_>>();
    store.save_all(&report.contacts, &groups)?;
    tracing::info!(
        "Saved {} contacts and {} groups to {}",
        report.contacts.len(),
        groups.len(),
        store.data_dir().display()
    );
    Ok(report)
}

pub async fn run_pull(ctx: &Context, cached: bool) -> Result<(), CliError> {
    let snapshot = if cached {
        ctx.cache().load()?
    } else {
        let client = ctx.remote_client()?;
        let mut session = SyncSession::new();
        fetch_and_cache(&client, &mut session, &ctx.cache()).await?
    };

    let mut reviewer = TerminalReviewer::stdio();
    let report = pull_contacts(ctx, snapshot, &mut reviewer)?;
    println!(
        "{} unchanged, {} etag-only, {} accepted, {} declined, {} remote-only",
        report.unchanged, report.etag_only, report.accepted, report.declined, report.unmatched_remote
    );
    Ok(())
}
