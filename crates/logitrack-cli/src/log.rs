//! The `log` subcommand: print locally stored registrations.

use logitrack_core::AppConfig;
use logitrack_store::RegistrationLog;

pub fn run_log(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let log = RegistrationLog::new(&config.data_dir);
    let mut records = log.read()?;

    if records.is_empty() {
        println!("no local registrations at {}", log.path().display());
        return Ok(());
    }

    let total = records.len();
    records.truncate(limit);

    println!(
        "{:<15} {:<11} {:<24} {:<7} {}",
        "PACKAGE", "PHONE", "LOCATION", "PICKUP", "DATE"
    );
    for record in &records {
        let location = format!("{:.6}, {:.6}", record.latitude, record.longitude);
        let when = record.timestamp.with_timezone(&chrono::Local);
        println!(
            "{:<15} {:<11} {:<24} {:<7} {}",
            record.package_code,
            record.phone,
            location,
            if record.is_pickup { "yes" } else { "no" },
            when.format("%Y-%m-%d %H:%M")
        );
    }

    if total > records.len() {
        println!("({} more not shown; raise --limit)", total - records.len());
    }
    Ok(())
}
