//! Implementation of the `stagetime stages` command.
//!
//! Shows how a request splits into stages without rendering anything.
//! Every invocation is still decoded, so malformed encodings show up here.

use crate::cli::StagesArgs;
use crate::config::Config;
use crate::error::{Result, StageTimeError};
use crate::manifest::ManifestContext;
use crate::request::RevisionRunRequest;
use chrono::{DateTime, Utc};

/// One stage and the invocations assigned to it, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StageEntry {
    stage: i64,
    invocations: Vec<String>,
}

/// Stage layout of a request plus any invocations that do not decode.
#[derive(Debug)]
struct StagePlan {
    stages: Vec<StageEntry>,
    problems: Vec<(String, i64, StageTimeError)>,
}

/// Execute the `stagetime stages` command.
pub fn cmd_stages(args: StagesArgs) -> Result<()> {
    let request = RevisionRunRequest::load(&args.request)?;
    let plan = plan(&request, &Utc::now());

    println!("Stages for {} ({}):", request.commit_id, request.repo_name);
    for entry in &plan.stages {
        println!("  stage {}: {}", entry.stage, entry.invocations.join(", "));
    }

    if plan.problems.is_empty() {
        return Ok(());
    }

    eprintln!("Malformed:");
    for (name, stage, error) in &plan.problems {
        eprintln!("  {} (stage {}): {}", name, stage, error);
    }

    Err(StageTimeError::PartialRender {
        failed: plan.problems.len(),
        total: request.pipelineruns.len(),
    })
}

/// Group invocations by stage in first-seen order and decode each one.
fn plan(request: &RevisionRunRequest, now: &DateTime<Utc>) -> StagePlan {
    let settings = Config::default().render_settings();
    let mut stages: Vec<StageEntry> = Vec::new();
    let mut problems = Vec::new();

    for invocation in &request.pipelineruns {
        match stages.iter_mut().find(|entry| entry.stage == invocation.stage) {
            Some(entry) => entry.invocations.push(invocation.name.clone()),
            None => stages.push(StageEntry {
                stage: invocation.stage,
                invocations: vec![invocation.name.clone()],
            }),
        }

        if let Err(error) = ManifestContext::build(request, invocation, &settings, now) {
            problems.push((invocation.name.clone(), invocation.stage, error));
        }
    }

    StagePlan { stages, problems }
}
