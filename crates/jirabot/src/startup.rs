use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use jirabot_cli::{validate_cli, Cli};
use jirabot_runtime::{
    run_event_loop, EventLoopExit, NotificationRenderer, ReferenceMatcher, RuntimeContext,
};
use jirabot_slack::{SlackApiClient, SlackSocketTransport};
use jirabot_tracker::{load_projects, JiraApiClient};
use tokio::sync::{mpsc, watch};

/// Startup products handed to the running bot.
pub(crate) struct BotRuntime {
    pub(crate) context: Arc<RuntimeContext>,
    pub(crate) slack: SlackApiClient,
}

/// Validates config, loads the project directory once and builds the shared
/// runtime context. Any failure here is fatal and happens before chat connects.
pub(crate) async fn prepare_runtime(cli: &Cli) -> Result<BotRuntime> {
    validate_cli(cli)?;

    let tracker = JiraApiClient::new(
        &cli.jira_url,
        &cli.jira_user,
        &cli.jira_password,
        cli.jira_request_timeout_ms,
    )
    .context("failed to create jira client")?;
    let projects = load_projects(&tracker)
        .await
        .context("failed to load jira projects")?;
    let matcher = ReferenceMatcher::build(projects.keys())
        .context("failed to build issue reference matcher")?;
    tracing::info!(
        projects = projects.len(),
        jira_url = %tracker.base_url(),
        "issue reference matcher ready"
    );

    let slack = SlackApiClient::new(
        &cli.slack_api_base,
        &cli.slack_app_token,
        &cli.slack_token,
        cli.slack_request_timeout_ms,
    )
    .context("failed to create slack client")?;
    let renderer = NotificationRenderer::new(tracker.base_url(), &cli.icon_url, &cli.bot_name);
    let context = RuntimeContext::new(
        matcher,
        Arc::new(tracker),
        Arc::new(slack.clone()),
        renderer,
    );

    Ok(BotRuntime {
        context: Arc::new(context),
        slack,
    })
}

pub(crate) async fn run_bot(cli: Cli) -> Result<ExitCode> {
    let runtime = prepare_runtime(&cli).await?;

    let (events_tx, events_rx) = mpsc::channel(cli.event_buffer);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let transport = SlackSocketTransport::new(
        runtime.slack,
        Duration::from_millis(cli.slack_reconnect_delay_ms),
    );
    let transport_shutdown = shutdown_rx.clone();
    let transport_task =
        tokio::spawn(async move { transport.run(events_tx, transport_shutdown).await });

    let signal_tx = shutdown_tx.clone();
    let signal_task = tokio::spawn(async move {
        wait_for_termination().await;
        tracing::info!("termination signal received");
        let _ = signal_tx.send(true);
    });

    let report = run_event_loop(runtime.context, events_rx, shutdown_rx).await;

    let _ = shutdown_tx.send(true);
    signal_task.abort();
    match transport_task.await {
        Ok(exit) => tracing::debug!(?exit, "slack transport stopped"),
        Err(error) => tracing::warn!(%error, "slack transport task failed"),
    }

    Ok(ExitCode::from(exit_status_for(report.exit)))
}

fn exit_status_for(exit: EventLoopExit) -> u8 {
    match exit {
        EventLoopExit::AuthInvalidated => 1,
        EventLoopExit::Shutdown | EventLoopExit::StreamClosed => 0,
    }
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(error) => {
            tracing::warn!(%error, "failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}
