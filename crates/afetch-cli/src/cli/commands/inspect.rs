//! `afetch inspect` – check an artifact already on disk.

use anyhow::{Context, Result};
use afetch_core::config::AfetchConfig;
use afetch_core::inspect::{self, Inspection};
use afetch_core::Verdict;

use super::policy::build_policy;
use crate::cli::InspectArgs;

pub async fn run_inspect(args: &InspectArgs, cfg: &AfetchConfig) -> Result<()> {
    let policy = build_policy(&args.policy, None, cfg, false)?;
    let path = args.path.clone();
    let found = tokio::task::spawn_blocking(move || inspect::inspect(&path, &policy))
        .await
        .context("inspect task failed")??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else {
        print!("{}", render(&found));
    }

    match &found.verdict {
        Verdict::Valid => Ok(()),
        Verdict::Degraded(reason) | Verdict::Invalid(reason) => {
            anyhow::bail!("{} is not a valid artifact: {}", found.path.display(), reason)
        }
    }
}

fn render(i: &Inspection) -> String {
    let verdict = match &i.verdict {
        Verdict::Valid => "valid".to_string(),
        Verdict::Degraded(reason) => format!("degraded: {}", reason),
        Verdict::Invalid(reason) => format!("invalid: {}", reason),
    };
    let mut out = format!(
        "path:    {}\nsize:    {} bytes\nhead:    {}\nsha256:  {}\nverdict: {}\n",
        i.path.display(),
        i.size,
        i.head_hex,
        i.sha256,
        verdict
    );
    if let Some(preview) = &i.text_preview {
        out.push_str("preview:\n");
        for line in preview.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
