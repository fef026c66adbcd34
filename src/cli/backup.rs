//! Backup CLI commands
//!
//! Export, restore and inspect encrypted backup files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::backup::{
    ensure_backup_path, BackupExporter, BackupFormat, ExportOptions, RestoreFlow, RestoreState,
    BACKUP_CONTENT_TYPE,
};
use crate::config::{paths::WellplanPaths, settings::Settings};
use crate::crypto::{EncryptedEnvelope, Passphrase};
use crate::error::{RestoreError, WellplanError, WellplanResult};
use crate::store::{JsonFileStore, RecordSink};

/// Environment variable that supplies the passphrase non-interactively
pub const PASSPHRASE_ENV: &str = "WELLPLAN_PASSPHRASE";

/// Arguments for `wellplan export`
#[derive(Debug, Clone, clap::Args)]
pub struct ExportArgs {
    /// Directory to write the backup into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Nickname used in the filename
    #[arg(short, long)]
    pub nickname: Option<String>,

    /// File extension
    #[arg(short, long, value_enum)]
    pub format: Option<BackupFormat>,

    /// Pretty-print the backup file
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for `wellplan restore`
#[derive(Debug, Clone, clap::Args)]
pub struct RestoreArgs {
    /// Backup file (.wbap or .json)
    pub file: PathBuf,

    /// Replace an installed plan without asking
    #[arg(short, long)]
    pub force: bool,
}

/// Handle `wellplan export`
pub fn handle_export(
    paths: &WellplanPaths,
    settings: &Settings,
    store: &JsonFileStore,
    args: ExportArgs,
) -> WellplanResult<()> {
    let options = ExportOptions {
        nickname: args.nickname.or_else(|| settings.plan_nickname.clone()),
        format: args.format.unwrap_or(settings.default_format),
        pretty: args.pretty || settings.pretty_print,
    };
    let dir = args
        .output_dir
        .unwrap_or_else(|| settings.resolve_export_dir(paths));

    let passphrase = match passphrase_from_env() {
        Some(p) => p,
        None => {
            println!("Choose a passphrase for this backup.");
            println!("You will need it to restore. It cannot be recovered if lost.");
            prompt_new_passphrase()?
        }
    };
    if passphrase.is_empty() {
        println!("Warning: the passphrase is empty. Anyone with the file can restore it.");
    }

    println!("Encrypting backup...");
    let summary = match BackupExporter::new(store, options).export_to_dir(&dir, &passphrase) {
        Ok(summary) => summary,
        Err(e) if e.is_not_found() => {
            println!("There is no installed plan to back up yet.");
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    println!("Backup written to: {}", summary.path.display());
    println!("  Content type: {}", BACKUP_CONTENT_TYPE);
    println!(
        "  Profile: {}",
        if summary.has_profile { "included" } else { "none" }
    );
    println!("  Check-ins: {}", summary.check_in_count);

    Ok(())
}

/// Handle `wellplan restore`
pub fn handle_restore(store: &JsonFileStore, args: RestoreArgs) -> WellplanResult<()> {
    ensure_backup_path(&args.file)?;
    let contents = read_backup_text(&args.file)?;

    if store.has_plan()? && !args.force && !confirm_overwrite()? {
        println!("Aborted.");
        return Ok(());
    }

    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut flow = RestoreFlow::new();
    flow.select_file(file_name, contents);

    let mut supplied = passphrase_from_env();
    let interactive = supplied.is_none();

    loop {
        let passphrase = match supplied.take() {
            Some(p) => p,
            None => prompt_passphrase("Backup passphrase: ")?,
        };
        flow.set_passphrase(passphrase);

        let Some(state) = flow.submit_and_wait().cloned() else {
            return Err(WellplanError::Validation(
                "Restore could not be submitted".to_string(),
            ));
        };

        match state {
            RestoreState::Success => break,
            RestoreState::SoftError { .. } if interactive => {
                println!("That passphrase didn't match. Try again.");
                flow.dismiss();
            }
            RestoreState::SoftError { .. } => {
                return Err(RestoreError::DecryptionFailed.into());
            }
            RestoreState::HardError { error } => {
                print_hard_error(&error);
                return Err(error.into());
            }
            other => {
                return Err(WellplanError::Validation(format!(
                    "Unexpected restore state: {:?}",
                    other
                )));
            }
        }
    }

    let result = flow.take_restored().ok_or_else(|| {
        WellplanError::Validation("Restore succeeded without a result".to_string())
    })?;
    store.persist_restore(&result)?;

    println!("{}", result.summary());
    if result.needs_onboarding() {
        println!("No completed profile was in this backup; you'll be asked to set one up.");
    }

    Ok(())
}

/// Handle `wellplan inspect`
pub fn handle_inspect(file: &Path) -> WellplanResult<()> {
    ensure_backup_path(file)?;
    let contents = read_backup_text(file)?;
    let envelope = EncryptedEnvelope::from_json(&contents)?;
    let info = envelope.describe();

    println!("Backup file: {}", file.display());
    println!("  Format version: {}", info.version);
    println!("  Encrypted size: {} bytes", info.ciphertext_len);
    if info.supported {
        println!("  Can be restored by this version: yes");
    } else {
        println!("  Can be restored by this version: no (update wellplan)");
    }

    Ok(())
}

fn read_backup_text(path: &Path) -> WellplanResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => RestoreError::InvalidFormat.into(),
        _ => WellplanError::Io(format!("Failed to read {}: {}", path.display(), e)),
    })
}

fn print_hard_error(error: &RestoreError) {
    println!();
    println!("Restore failed");
    println!("==============");
    println!("{}", error);
    println!();
    match error {
        RestoreError::DecryptionFailed => {
            println!("The passphrase did not match twice, or the file has been damaged.");
        }
        RestoreError::UnsupportedVersion { .. } => {
            println!("This backup was made by a newer version. Update wellplan and retry.");
        }
        RestoreError::InvalidFormat | RestoreError::InvalidStructure(_) => {
            println!("This file is not a complete wellbeing plan backup.");
        }
    }
    println!();
    println!("Run the restore command again to pick a file, or leave your data as it is.");
}

fn confirm_overwrite() -> WellplanResult<bool> {
    print!("A plan is already installed. Replace it with the backup? (yes/no): ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

fn passphrase_from_env() -> Option<Passphrase> {
    std::env::var(PASSPHRASE_ENV).ok().map(Passphrase::from)
}

/// Prompt for a new passphrase with confirmation
fn prompt_new_passphrase() -> WellplanResult<Passphrase> {
    loop {
        let first = prompt_passphrase("New passphrase: ")?;
        let second = prompt_passphrase("Confirm passphrase: ")?;

        if first != second {
            println!("Passphrases do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

/// Prompt for a passphrase (hidden input)
fn prompt_passphrase(prompt: &str) -> WellplanResult<Passphrase> {
    rpassword::prompt_password(prompt)
        .map(Passphrase::from)
        .map_err(|e| WellplanError::Io(format!("Failed to read passphrase: {}", e)))
}
