//! The `health` command.

use anyhow::bail;
use serde::Serialize;
use submittal_core::{ServiceHealth, ServiceStatus};

use super::print_json;
use crate::TRACING_TARGET_COMMAND;
use crate::config::Services;

#[derive(Debug, Serialize)]
struct HealthReport {
    renderer: ServiceHealth,
    store: ServiceHealth,
}

/// Checks the renderer and the store; fails unless both are healthy.
pub async fn health(services: &Services) -> anyhow::Result<()> {
    let (renderer, store) = tokio::join!(
        services.renderer.health_check(),
        services.store.health_check()
    );

    let report = HealthReport {
        renderer: renderer.unwrap_or_else(|e| ServiceHealth::unhealthy(e.to_string())),
        store: store.unwrap_or_else(|e| ServiceHealth::unhealthy(e.to_string())),
    };

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        renderer = ?report.renderer.status,
        store = ?report.store.status,
        "Health checked"
    );

    print_json(&report)?;

    if report.renderer.status != ServiceStatus::Healthy
        || report.store.status != ServiceStatus::Healthy
    {
        bail!("one or more services are not healthy");
    }
    Ok(())
}
