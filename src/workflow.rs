use crate::agents::{ApplyReport, CheckReport, ManifestEditor, UpdateChecker, UpdateInteraction};
use crate::config::{Overrides, Settings};
use crate::error::Result;
use crate::github::CheckStatus;
use crate::github::version::Version;
use crate::release::ReleaseSourceFactory;
use colored::Colorize;

fn build_checker(settings: &Settings) -> Result<UpdateChecker<'_>> {
    let releases = ReleaseSourceFactory::create(settings)?;
    let editor = ManifestEditor::new(&settings.manifest_path);
    Ok(UpdateChecker::new(&settings.catalog, editor, releases).with_progress(true))
}

/// Check every configured service.
///
/// Launchers call this before starting the stack and use
/// [`CheckReport::updates_available`] to decide whether to offer an update.
pub fn check_for_updates(settings: &Settings) -> Result<CheckReport> {
    let checker = build_checker(settings)?;
    Ok(run_check(&checker))
}

fn run_check(checker: &UpdateChecker<'_>) -> CheckReport {
    println!("{}", "🔍 Checking for service updates...".cyan().bold());
    println!(
        "   manifest: {}",
        checker.editor().path().display().to_string().dimmed()
    );

    let report = checker.check_all();
    print_check_results(&report);
    report
}

/// Execute the check workflow (dry-run)
pub fn execute_check(overrides: &Overrides) -> Result<()> {
    let settings = Settings::load(overrides)?;
    let report = check_for_updates(&settings)?;

    if report.updates_available() {
        println!("\n{}", "To apply these updates, run:".dimmed());
        println!("  {}", "svcup update".cyan());
    } else {
        println!("\n{}", "✨ No updates available".green().bold());
    }
    Ok(())
}

/// Default workflow: check and print a summary with stats
pub fn execute_summary(overrides: &Overrides) -> Result<()> {
    let settings = Settings::load(overrides)?;
    let report = check_for_updates(&settings)?;
    print_summary(&report);
    Ok(())
}

/// Execute the update workflow
pub fn execute_update(
    overrides: &Overrides,
    service: Option<&str>,
    interactive: bool,
) -> Result<()> {
    let settings = Settings::load(overrides)?;
    let checker = build_checker(&settings)?;
    let report = run_check(&checker);

    println!("\n{}", "🔄 Updating services...".cyan().bold());
    let mut interaction = UpdateInteraction::new(interactive);
    if interaction.is_enabled() {
        println!("{}", "   (interactive: confirm each update)".dimmed());
    }

    let applied = checker.apply_updates(&report, service, &mut interaction);
    print_apply_report(&applied);
    Ok(())
}

/// Execute the list workflow - display the configured services
pub fn execute_list(overrides: &Overrides) -> Result<()> {
    let settings = Settings::load(overrides)?;

    println!("{}", "📦 Configured services:".cyan().bold());
    for service in settings.catalog.iter() {
        let tag_note = if service.tag_optional {
            " (tag optional)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  • {} {} ← {}{}",
            service.name.white().bold(),
            service.image.cyan(),
            service.project.dimmed(),
            tag_note
        );
    }
    println!(
        "\n  manifest: {}\n  release index: {}",
        settings.manifest_path.display(),
        settings.release_index
    );
    Ok(())
}

fn print_check_results(report: &CheckReport) {
    println!();
    for result in report.iter() {
        let current = result.current.as_deref().unwrap_or("unknown");
        let latest = result.latest.as_deref().unwrap_or("unknown");

        if result.is_error() {
            println!(
                "  {} {} {}",
                "❌".red(),
                result.service.white().bold(),
                CheckStatus::Error.to_string().red()
            );
            for error in &result.errors {
                println!("     {}", error.dimmed());
            }
            continue;
        }

        let icon = if result.update_available { "🆕" } else { "✅" };
        let status = match result.status {
            CheckStatus::UpdateAvailable | CheckStatus::UsingLatestTag => {
                result.status.to_string().yellow()
            }
            CheckStatus::ComparisonFailed => result.status.to_string().red(),
            _ => result.status.to_string().green(),
        };
        let channel = match Version::parse(latest) {
            Ok(v) if v.is_prerelease() => " pre-release".yellow().to_string(),
            _ => String::new(),
        };

        println!(
            "  {} {} current: {}, latest: {}{} ({})",
            icon,
            result.service.white().bold(),
            current,
            latest.green(),
            channel,
            status
        );
    }
}

fn print_summary(report: &CheckReport) {
    println!(
        "\n{} {}",
        "📊 Update Summary:".cyan().bold(),
        format!("({} services checked)", report.len()).dimmed()
    );
    println!("{}", "=".repeat(50));

    for result in report.iter().filter(|r| r.update_available) {
        println!(
            "🆕 {}: {} → {}",
            result.service.white().bold(),
            result.current.as_deref().unwrap_or("unknown").red(),
            result.latest.as_deref().unwrap_or("unknown").green().bold()
        );
    }

    let stats = report.stats();
    println!(
        "\n📈 Stats: {} updates available, {} up to date, {} errors",
        stats.updates_available.to_string().yellow(),
        stats.up_to_date.to_string().green(),
        stats.errors.to_string().red()
    );

    if stats.updates_available > 0 {
        println!(
            "\n💡 Run '{}' to update all services",
            "svcup update".cyan()
        );
        println!(
            "💡 Run '{}' to update a specific service",
            "svcup update --service SERVICE_NAME".cyan()
        );
    }
}

fn print_apply_report(applied: &ApplyReport) {
    for (name, version) in &applied.updated {
        println!("  {} Updated {} to version {}", "✅".green(), name.white().bold(), version.green());
    }
    for name in &applied.up_to_date {
        println!("  ⏭️  {} is already up to date", name);
    }
    for name in &applied.skipped_errors {
        println!(
            "  ⏭️  {} skipped: {}",
            name,
            "version check failed".red()
        );
    }
    for name in &applied.declined {
        println!("  ⏭️  {} skipped at user request", name);
    }
    for (name, reason) in &applied.failed {
        println!("  {} Failed to update {}: {}", "❌".red(), name.white().bold(), reason.red());
    }
    for name in &applied.unknown {
        println!("  {} Unknown service: {}", "❌".red(), name);
    }

    if applied.cancelled {
        println!("\n{}", "Update cancelled by user.".yellow());
    }

    if applied.updated.is_empty() {
        println!("\n{}", "No updates applied".yellow());
    } else {
        println!(
            "\n{} {}",
            "✅ Updated services:".green().bold(),
            applied.updated_services().join(", ")
        );
        println!("\n{}", "🔄 You may want to restart services to use the new versions:".dimmed());
        println!("   {}", "docker compose up -d".cyan());
    }
}
