//! Status and configuration commands

use crate::config::{paths::WellplanPaths, settings::Settings};
use crate::error::WellplanResult;
use crate::store::{JsonFileStore, RecordSource};

/// Handle `wellplan status`
pub fn handle_status(store: &JsonFileStore) -> WellplanResult<()> {
    let snapshot = store.load_snapshot()?;

    match snapshot.plan {
        Some(ref plan) => {
            println!("Plan: {} (revision {})", plan.record.action_plan_id, plan.record.revision_version);
            println!("  Installed: {}", plan.record.installed_at.format("%Y-%m-%d %H:%M UTC"));
            println!("  Local id: {}", plan.id);
        }
        None => {
            println!("No plan installed.");
            return Ok(());
        }
    }

    match snapshot.profile {
        Some(ref profile) => {
            println!("Profile: {} ({})", profile.record.display_name, profile.id);
            println!("  Onboarding complete: {}", profile.record.onboarding_complete);
            if profile.record.notifications_enabled {
                println!(
                    "  Reminders: {} at {}",
                    profile.record.notification_frequency,
                    profile.record.notification_time.as_deref().unwrap_or("--:--")
                );
            }
        }
        None => println!("Profile: not set up"),
    }

    println!("Check-ins: {}", snapshot.check_ins.len());
    if let Some(latest) = snapshot.check_ins.iter().max_by_key(|c| c.record.created_at) {
        println!(
            "  Latest: {} on {} ({})",
            latest.record.zone,
            latest.record.created_at.format("%Y-%m-%d"),
            latest.id
        );
    }

    Ok(())
}

/// Handle `wellplan config`
pub fn handle_config(paths: &WellplanPaths, settings: &Settings) -> WellplanResult<()> {
    println!("wellplan Configuration");
    println!("======================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Records file:     {}", paths.records_file().display());
    println!("Export directory: {}", settings.resolve_export_dir(paths).display());
    println!();
    println!("Settings:");
    println!("  Default format: {}", settings.default_format);
    println!("  Pretty print:   {}", settings.pretty_print);
    println!(
        "  Nickname:       {}",
        settings.plan_nickname.as_deref().unwrap_or("(default)")
    );
    Ok(())
}
