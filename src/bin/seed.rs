//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use anyhow::Context;
use sqlx::PgPool;
use surfacesim::config::SimulationDefaults;
use surfacesim::models::assessment::CreateAssessment;
use surfacesim::models::risk_model::CreateRiskModel;
use surfacesim::services::normalizer::RawMetrics;
use surfacesim::services::{assessment, risk_model};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = surfacesim::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    surfacesim::db::migrate(&pool).await?;

    println!("=== Surface Simulator Seed Script ===");

    seed_risk_models(&pool).await?;
    seed_sample_assessment(&pool).await?;

    println!("\n=== Seed complete! ===");

    Ok(())
}

async fn seed_risk_models(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM risk_models")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Risk models already exist ({count})");
        return Ok(());
    }

    let models = [
        (
            "Baseline",
            "Moderate quadratic growth, crosses R' = 3 at x = 73.3",
            0.015,
            0.8,
            5.0,
        ),
        (
            "Aggressive",
            "Steep growth for sprawling, internet-facing estates",
            0.05,
            1.2,
            10.0,
        ),
        (
            "Linear",
            "Constant marginal risk, never crosses the default threshold",
            0.0,
            2.0,
            5.0,
        ),
    ];

    for (name, description, a, b, c) in models {
        let input = CreateRiskModel {
            name: name.to_string(),
            description: Some(description.to_string()),
            a,
            b,
            c,
        };
        risk_model::create(pool, &input)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed risk model {name}: {e}"))?;
    }

    println!("[done] Created {} risk models", models.len());
    Ok(())
}

async fn seed_sample_assessment(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assessments")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Assessments already exist ({count})");
        return Ok(());
    }

    let input = CreateAssessment {
        name: "Customer Portal".to_string(),
        metrics: RawMetrics {
            public_endpoints: 180,
            admin_endpoints: 6,
            third_party_integrations: 14,
            monthly_active_users: 250_000,
            privileged_accounts: 40,
            mfa_adoption_pct: 72.0,
            failed_login_rate_pct: 1.8,
            monthly_requests: 12_000_000,
            unique_countries: 22,
            traffic_concentration_pct: 55.0,
            open_critical_vulns: 2,
            mean_patch_time_days: 21,
            waf_enabled: true,
            rate_limiting_enabled: false,
        },
    };

    let defaults = SimulationDefaults::from_env();
    defaults.check()?;

    let out = assessment::create(pool, &input, &defaults)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to seed assessment: {e}"))?;

    println!(
        "[done] Created sample assessment '{}' (x = {:.1}, {})",
        out.summary.name, out.summary.x_score, out.summary.band
    );
    Ok(())
}
