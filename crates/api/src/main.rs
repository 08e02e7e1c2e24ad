#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = approvalgate_api::config::GateConfig::from_env()?;
    approvalgate_observability::init(config.log_format);
    tracing::info!(
        site = %config.site_name,
        site_url = %config.site_url,
        admin = %config.admin_username,
        session_ttl_hours = config.session_ttl_hours,
        "configuration loaded"
    );

    let app = approvalgate_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
