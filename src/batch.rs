use indicatif::{ProgressBar, ProgressStyle};

use crate::assess::{AssessmentResult, assess};
use crate::denylist::Denylists;
use crate::input::InputEntry;
use crate::npi::{LookupOutcome, ProfileSource, RegistryClient, is_valid_npi};

/// Drives validate -> lookup -> assess for every entry, in input order.
/// Every entry yields exactly one result; nothing here aborts the batch.
pub async fn run_batch<S: ProfileSource>(
    entries: &[InputEntry],
    client: &mut RegistryClient<S>,
    denylists: &Denylists,
) -> Vec<AssessmentResult> {
    let progress = ProgressBar::new(entries.len() as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [screen {elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
    progress.set_message("starting lookups");

    let mut results = Vec::with_capacity(entries.len());
    let mut found = 0usize;
    let mut no_match = 0usize;
    let mut failed = 0usize;
    let mut invalid = 0usize;

    for entry in entries {
        if !is_valid_npi(&entry.npi) {
            invalid += 1;
            results.push(AssessmentResult::invalid_format(entry.npi.clone()));
            progress.inc(1);
            progress.set_message(format!(
                "ok={found} no_match={no_match} failed={failed} invalid={invalid}"
            ));
            continue;
        }

        let record = match client.lookup(&entry.npi).await {
            LookupOutcome::Found(record) => {
                found += 1;
                Some(record)
            }
            LookupOutcome::NotFound => {
                no_match += 1;
                None
            }
            LookupOutcome::Failed(cause) => {
                failed += 1;
                eprintln!("Lookup failed for {}: {}", entry.npi, cause);
                None
            }
        };

        results.push(assess(
            &entry.npi,
            record,
            denylists,
            entry.cpt_code.as_deref(),
            entry.claim_state.as_deref(),
        ));
        progress.inc(1);
        progress.set_message(format!(
            "ok={found} no_match={no_match} failed={failed} invalid={invalid}"
        ));
    }

    progress.finish_with_message(format!(
        "done: ok={found} no_match={no_match} failed={failed} invalid={invalid}"
    ));
    results
}
