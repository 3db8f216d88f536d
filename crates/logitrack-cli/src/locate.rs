//! The `locate` subcommand: one acquisition ladder, printed.

use logitrack_core::AppConfig;

use crate::register;

pub async fn run_locate(config: &AppConfig) -> anyhow::Result<()> {
    let acquisition = register::acquire_position(config).await?;

    println!();
    println!("coordinate: {}", acquisition.coordinate);
    println!("accuracy:   within {:.0} m", acquisition.accuracy_m);
    println!(
        "mode:       {}",
        if acquisition.high_accuracy {
            "high accuracy"
        } else {
            "low accuracy"
        }
    );
    println!("attempts:   {}", acquisition.attempts);
    Ok(())
}
