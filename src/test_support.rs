use crate::config::Config;
use crate::manifest::RenderSettings;
use crate::request::{RevisionRunRequest, RunInvocation};
use chrono::{DateTime, TimeZone, Utc};

/// Render time used across tests; names get the suffix `180312` + commit fragment.
pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 18, 9, 3, 12).unwrap()
}

pub(crate) fn test_settings() -> RenderSettings {
    RenderSettings {
        namespace: "tekton-ci".to_string(),
        ..Config::default().render_settings()
    }
}

pub(crate) fn invocation(name: &str, stage: i64) -> RunInvocation {
    RunInvocation {
        name: name.to_string(),
        stage,
        ..Default::default()
    }
}

pub(crate) fn request_with(pipelineruns: Vec<RunInvocation>) -> RevisionRunRequest {
    RevisionRunRequest {
        author: "patrick".to_string(),
        commit_id: "a1b2c3d4e5".to_string(),
        repo_name: "stageTime-server".to_string(),
        repo_url: "https://github.com/stuttgart-things/stageTime-server.git".to_string(),
        pushed_at: "2024-03-18T09:03:12Z".to_string(),
        pipelineruns,
    }
}

/// A two-stage request with one fully populated invocation.
pub(crate) fn sample_request() -> RevisionRunRequest {
    request_with(vec![
        RunInvocation {
            name: "build-kaniko".to_string(),
            stage: 0,
            params: "context=/kaniko/decoder, dockerfile=./Dockerfile".to_string(),
            listparams: "build-args=GO_VERSION=1.21;CGO_ENABLED=0".to_string(),
            workspaces:
                "source=persistentVolumeClaim;claimName;git-pvc, ssh=secret;secretName;git-ssh"
                    .to_string(),
        },
        invocation("lint", 1),
    ])
}
