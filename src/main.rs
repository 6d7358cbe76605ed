use git_push_notify::logging::{FileLogger, setup_logging};
use git_push_notify::{
    BaseUrlLinks, GitCliHistory, PipelineOutcome, PushEvent, PushNotificationPipeline, PushUser,
    RefChange, RefOutcome, Repository, ReqwestNotifier, load_config,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "push_notify.toml";
const DEFAULT_PROJECT: &str = "default";

/// Repository slug from the hook's working directory, without a `.git` suffix
fn slug_from_dir(dir: &Path) -> Option<String> {
    let name = dir.file_name()?.to_str()?;
    let name = if name == ".git" {
        dir.parent()?.file_name()?.to_str()?
    } else {
        name
    };
    Some(name.strip_suffix(".git").unwrap_or(name).to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Reads `<old> <new> <ref>` lines from stdin, skipping malformed ones.
async fn read_ref_changes() -> std::io::Result<Vec<RefChange>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut changes = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match RefChange::from_hook_line(&line) {
            Some(change) => changes.push(change),
            None => warn!("Ignoring malformed ref update line: {:?}", line),
        }
    }
    Ok(changes)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let file_logger =
        env_non_empty("PUSH_NOTIFY_LOG_DIR").map(|dir| FileLogger::new(PathBuf::from(dir)));
    let _guard = match setup_logging(file_logger.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup failed: {}", e);
            None
        }
    };

    let config_path =
        std::env::var("PUSH_NOTIFY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    // Exit status stays 0 on every path below.
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    info!("Using config at {:?}", config_path);

    let repo_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Cannot determine repository directory: {}", e);
            return;
        }
    };
    let Some(slug) = env_non_empty("PUSH_NOTIFY_REPO").or_else(|| slug_from_dir(&repo_dir)) else {
        error!("Cannot determine repository slug from {}", repo_dir.display());
        return;
    };
    let project =
        env_non_empty("PUSH_NOTIFY_PROJECT").unwrap_or_else(|| DEFAULT_PROJECT.to_string());
    let name = env_non_empty("PUSH_NOTIFY_REPO_NAME").unwrap_or_else(|| slug.clone());

    let user = match (
        env_non_empty("PUSH_NOTIFY_USER_NAME"),
        env_non_empty("PUSH_NOTIFY_USER_EMAIL"),
    ) {
        (Some(display_name), Some(email)) => Some(PushUser {
            display_name,
            email,
        }),
        _ => None,
    };

    let ref_changes = match read_ref_changes().await {
        Ok(changes) => changes,
        Err(e) => {
            error!("Failed to read ref updates from stdin: {}", e);
            return;
        }
    };

    let event = PushEvent {
        repository: Repository::new(project, slug, name),
        user,
        ref_changes,
    };

    let pipeline = PushNotificationPipeline::new(
        Arc::new(config.clone()),
        Arc::new(GitCliHistory::new(repo_dir)),
        Arc::new(BaseUrlLinks::new(config.base_url.clone())),
        Arc::new(ReqwestNotifier::default()),
    );

    match pipeline.handle(&event).await {
        PipelineOutcome::Suppressed(reason) => {
            info!("No notifications sent: {:?}", reason);
        }
        PipelineOutcome::Processed(reports) => {
            let failed = reports
                .iter()
                .filter(|r| matches!(r.outcome, RefOutcome::Failed(_)))
                .count();
            info!(
                "Processed {} ref update(s), {} failed",
                reports.len(),
                failed
            );
        }
    }
}
