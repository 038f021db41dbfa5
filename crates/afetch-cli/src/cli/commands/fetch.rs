//! `afetch fetch` – try candidate URLs in order and persist the first valid artifact.

use anyhow::{Context, Result};
use afetch_core::config::AfetchConfig;
use afetch_core::{
    ArtifactFetcher, CandidateSources, FetchError, FetchOptions, FetchReport, FetchRequest,
};
use std::time::Duration;

use super::policy::build_policy;
use crate::cli::FetchArgs;

/// Fully resolved fetch: what the fetcher will run.
#[derive(Debug)]
pub struct FetchPlan {
    pub request: FetchRequest,
    pub options: FetchOptions,
}

/// Merge flags, the selected profile and config defaults into a plan.
pub fn plan_fetch(args: &FetchArgs, cfg: &AfetchConfig) -> Result<FetchPlan> {
    let profile = match args.profile.as_deref() {
        Some(name) => Some(
            cfg.profile(name)
                .with_context(|| format!("no artifact profile named {name:?} in config"))?,
        ),
        None => None,
    };

    let urls: &[String] = if !args.urls.is_empty() {
        &args.urls
    } else {
        profile.map(|p| p.urls.as_slice()).unwrap_or_default()
    };
    let sources = CandidateSources::parse(urls)?;

    let destination = args
        .output
        .clone()
        .or_else(|| profile.map(|p| p.destination.clone()))
        .context("no destination: pass --output or a --profile that sets one")?;

    let best_effort = args.best_effort || profile.is_some_and(|p| p.best_effort);
    let policy = build_policy(&args.policy, profile, cfg, best_effort)?;

    let mut options = cfg.fetch_options();
    if let Some(n) = args.max_redirects {
        options.max_redirects = n;
    }
    if let Some(secs) = args.timeout {
        options.timeout = Duration::from_secs(secs);
    }
    if let Some(ua) = &args.user_agent {
        options.user_agent = ua.clone();
    }
    options.skip_existing = args.skip_existing;

    Ok(FetchPlan {
        request: FetchRequest {
            sources,
            policy,
            destination,
        },
        options,
    })
}

pub async fn run_fetch(args: &FetchArgs, cfg: &AfetchConfig) -> Result<()> {
    let FetchPlan { request, options } = plan_fetch(args, cfg)?;
    let json = args.json;
    let fetcher = ArtifactFetcher::new(&options);

    let result = tokio::task::spawn_blocking(move || {
        fetcher.fetch_with(&request, |attempt| {
            if !json {
                println!("{}", attempt);
            }
        })
    })
    .await
    .context("fetch task failed")?;

    match result {
        Ok(report) => {
            if json {
                let out = serde_json::json!({ "ok": true, "report": report });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", summary(&report));
            }
            Ok(())
        }
        Err(FetchError::Exhausted { attempts }) => {
            if json {
                let out = serde_json::json!({ "ok": false, "attempts": attempts });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "FAILED: no valid artifact from {} candidate(s):",
                    attempts.len()
                );
                for attempt in &attempts {
                    println!("  {}", attempt);
                }
            }
            if args.no_fail {
                tracing::warn!("all candidates failed; exiting 0 because of --no-fail");
                Ok(())
            } else {
                anyhow::bail!("all {} candidate source(s) failed", attempts.len())
            }
        }
        Err(err @ FetchError::Persist(_)) => Err(err).context("could not write artifact"),
    }
}

fn summary(report: &FetchReport) -> String {
    let dest = report.destination.display();
    match report.source.as_deref() {
        None => format!(
            "OK: {} already valid ({} bytes); nothing fetched",
            dest, report.bytes
        ),
        Some(source) if report.verified => {
            format!("OK: {} ({} bytes) from {}", dest, report.bytes, source)
        }
        Some(source) => format!(
            "WARNING: {} ({} bytes) from {} is UNVERIFIED (best-effort mode)",
            dest, report.bytes, source
        ),
    }
}
