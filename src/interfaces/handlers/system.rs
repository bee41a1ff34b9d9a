use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use sysinfo::System;

use crate::{constants::START_TIME, AppState};

const CACHE_WINDOW_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
struct HealthResponse {
    status: String,
    database: String,
    uptime: String,
    started_at: String,
    timestamp: String,
    version: String,
    memory_usage: String,
    host: HostInfo,
}

#[derive(Serialize, Clone, Default)]
struct HostInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED: Lazy<RwLock<HealthResponse>> =
    Lazy::new(|| RwLock::new(HealthResponse::default()));

async fn build_response(state: &AppState) -> HealthResponse {
    let now = Utc::now();
    let uptime_secs = now.signed_duration_since(*START_TIME).num_seconds().max(0);

    let mut sys = System::new_all();
    sys.refresh_all();

    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok",
        Err(_) => "unavailable",
    };

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or("unknown".to_string(), |p| {
            format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0)
        });

    HealthResponse {
        status: "healthy".to_string(),
        database: database.to_string(),
        uptime: format_duration(Duration::from_secs(uptime_secs as u64)).to_string(),
        started_at: START_TIME.to_rfc3339(),
        timestamp: now.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
        host: HostInfo {
            os: System::name().unwrap_or_else(|| "unknown".to_string()),
            kernel: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            cpu_count: sys.cpus().len(),
            memory_total: format!(
                "{:.2} GB",
                sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0
            ),
        },
    }
}

/// Liveness endpoint. The full report (DB ping, process stats) is rebuilt at
/// most once per cache window so probes cannot hammer the database.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    if now - LAST_CHECK.load(Ordering::Relaxed) <= CACHE_WINDOW_SECS {
        return HttpResponse::Ok().json(CACHED.read().clone());
    }

    let response = build_response(&state).await;
    *CACHED.write() = response.clone();
    LAST_CHECK.store(now, Ordering::Relaxed);
    HttpResponse::Ok().json(response)
}
