//! The `register` subcommand: validate fields, resolve a location, submit.

use anyhow::Context;
use logitrack_core::{
    is_valid_package_code, is_valid_phone, AppConfig, Coordinate, LocationSelection,
    RegistrationInput, StorageSource,
};
use logitrack_geo::{
    AcquireObserver, AcquirePolicy, Acquisition, AttemptOutcome, GeolocateClient,
    LocationAcquirer, LocationErrorKind,
};
use logitrack_store::{SubmissionCoordinator, SubmissionReceipt};

pub struct RegisterArgs {
    pub package_code: String,
    pub phone: String,
    pub pickup: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Narrates ladder progress on stdout while the acquirer works.
struct ConsoleObserver;

impl AcquireObserver for ConsoleObserver {
    fn attempt_started(&self, attempt: u32, high_accuracy: bool) {
        let mode = if high_accuracy {
            "high accuracy"
        } else {
            "low accuracy"
        };
        println!("locating: attempt {attempt} ({mode})...");
    }

    fn attempt_finished(&self, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Success {
                coordinate,
                accuracy_m,
            } => {
                println!("position resolved: {coordinate} (within {accuracy_m:.0} m)");
            }
            AttemptOutcome::Failure { kind, .. } => {
                println!("attempt failed: {kind}");
            }
        }
    }
}

pub async fn run_register(config: &AppConfig, args: RegisterArgs) -> anyhow::Result<()> {
    // Field validation up front, so nobody waits on positioning with a
    // doomed submission.
    anyhow::ensure!(
        is_valid_package_code(args.package_code.trim()),
        "package code {:?} must start with 6 and contain exactly 13 digits",
        args.package_code
    );
    anyhow::ensure!(
        is_valid_phone(&args.phone),
        "phone {:?} must contain exactly 9 digits",
        args.phone
    );

    let selection = resolve_selection(config, &args).await?;

    let mut coordinator = SubmissionCoordinator::from_config(config)
        .context("failed to set up the submission channels")?;
    let receipt = coordinator
        .submit(&RegistrationInput {
            package_code: args.package_code,
            phone: args.phone,
            selection,
        })
        .await?;

    print_receipt(config, &receipt);
    Ok(())
}

async fn resolve_selection(
    config: &AppConfig,
    args: &RegisterArgs,
) -> anyhow::Result<LocationSelection> {
    if args.pickup {
        println!(
            "pickup at {} ({})",
            config.pickup_name, config.pickup_point
        );
        return Ok(LocationSelection::Pickup);
    }

    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let coordinate = Coordinate::new(lat, lng)?;
        return Ok(LocationSelection::Resolved(coordinate));
    }

    let acquisition = acquire_position(config).await?;
    Ok(LocationSelection::Resolved(acquisition.coordinate))
}

/// Runs one acquisition ladder with console progress; on terminal failure
/// the kind-specific remediation lands on stderr before the error returns.
pub(crate) async fn acquire_position(config: &AppConfig) -> anyhow::Result<Acquisition> {
    let provider = GeolocateClient::new(&config.geolocate_url, &config.user_agent)?;
    let mut acquirer = LocationAcquirer::new(provider, AcquirePolicy::from_app_config(config));

    match acquirer.acquire(&ConsoleObserver).await {
        Ok(acquisition) => Ok(acquisition),
        Err(e) => {
            eprintln!("{}", remediation(e.kind()));
            Err(e.into())
        }
    }
}

fn print_receipt(config: &AppConfig, receipt: &SubmissionReceipt) {
    let record = &receipt.record;
    let when = record.timestamp.with_timezone(&chrono::Local);

    println!();
    println!("registration saved");
    println!("  package:  {}", record.package_code);
    println!("  phone:    {}", record.phone);
    if record.is_pickup {
        println!(
            "  pickup:   {} (an agent will call to coordinate)",
            config.pickup_name
        );
    } else {
        println!(
            "  location: {:.6}, {:.6}",
            record.latitude, record.longitude
        );
    }
    println!("  date:     {}", when.format("%Y-%m-%d %H:%M"));
    match record.source {
        StorageSource::Remote => println!("  stored:   central sheet"),
        StorageSource::Local => {
            let total = receipt.log_len.unwrap_or(1);
            println!("  stored:   this device ({total} in the local log)");
        }
    }
}

/// Kind-specific guidance shown when positioning fails for good.
pub(crate) fn remediation(kind: LocationErrorKind) -> &'static str {
    match kind {
        LocationErrorKind::PermissionDenied => {
            "the positioning service refused this client\n\
             - check the geolocate service credentials for this host\n\
             - or pass the position yourself with --lat/--lng\n\
             - or use --pickup to collect at the pickup point"
        }
        LocationErrorKind::PositionUnavailable => {
            "no position could be determined right now\n\
             - check the network connection\n\
             - or pass the position yourself with --lat/--lng\n\
             - or use --pickup to collect at the pickup point"
        }
        LocationErrorKind::Timeout => {
            "positioning ran out of time on every attempt\n\
             - try again from a spot with better coverage\n\
             - or pass the position yourself with --lat/--lng\n\
             - or use --pickup to collect at the pickup point"
        }
        LocationErrorKind::Unknown => {
            "positioning failed unexpectedly\n\
             - try again in a moment\n\
             - or pass the position yourself with --lat/--lng\n\
             - or use --pickup to collect at the pickup point"
        }
    }
}
