use pgforge_tools::{ToolContext, ToolError};

pub async fn list(ctx: &ToolContext) -> Result<(), ToolError> {
    let migrations = ctx.migrator.list().await?;

    if migrations.is_empty() {
        println!("No migrations recorded");
        return Ok(());
    }

    println!("Recorded migrations:");
    for migration in &migrations {
        let marker = if migration.status.is_applied() {
            "applied"
        } else {
            "recorded"
        };
        println!(
            "  [{}] {} {} ({})",
            marker, migration.id, migration.name, migration.kind
        );
    }
    Ok(())
}

pub async fn apply(
    ctx: &ToolContext,
    from: Option<String>,
    force: bool,
) -> Result<(), ToolError> {
    let report = ctx.migrator.apply_pending(from.as_deref(), force).await?;

    println!(
        "Applied {} migration(s), skipped {} in {}ms",
        report.applied_count, report.skipped_count, report.execution_time_ms
    );
    for id in &report.applied_migrations {
        println!("  {}", id);
    }
    Ok(())
}

pub async fn revert(ctx: &ToolContext, id: Option<String>) -> Result<(), ToolError> {
    let reverted = ctx.migrator.revert(id.as_deref()).await?;

    println!(
        "Reverted migration: {} - {}",
        reverted.record.id, reverted.record.name
    );
    println!("Executed: {}", reverted.revert_sql);
    Ok(())
}
