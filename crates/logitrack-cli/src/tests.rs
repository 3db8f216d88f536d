use clap::Parser;
use logitrack_geo::LocationErrorKind;

use super::*;

#[test]
fn parses_register_with_pickup() {
    let cli = Cli::try_parse_from([
        "logitrack",
        "register",
        "--package-code",
        "6123456789012",
        "--phone",
        "987654321",
        "--pickup",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Register {
            pickup: true,
            lat: None,
            lng: None,
            ..
        }
    ));
}

#[test]
fn parses_register_with_a_manual_coordinate() {
    let cli = Cli::try_parse_from([
        "logitrack",
        "register",
        "--package-code",
        "6123456789012",
        "--phone",
        "987654321",
        "--lat",
        "-12.05",
        "--lng",
        "-77.03",
    ])
    .expect("expected valid cli args");

    if let Commands::Register {
        pickup, lat, lng, ..
    } = cli.command
    {
        assert!(!pickup);
        assert_eq!(lat, Some(-12.05));
        assert_eq!(lng, Some(-77.03));
    } else {
        panic!("unexpected command variant");
    }
}

#[test]
fn register_defaults_to_live_positioning() {
    let cli = Cli::try_parse_from([
        "logitrack",
        "register",
        "--package-code",
        "6123456789012",
        "--phone",
        "987654321",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Register {
            pickup: false,
            lat: None,
            lng: None,
            ..
        }
    ));
}

#[test]
fn pickup_conflicts_with_a_manual_coordinate() {
    let result = Cli::try_parse_from([
        "logitrack",
        "register",
        "--package-code",
        "6123456789012",
        "--phone",
        "987654321",
        "--pickup",
        "--lat",
        "-12.05",
        "--lng",
        "-77.03",
    ]);
    assert!(result.is_err());
}

#[test]
fn a_lone_latitude_is_rejected() {
    let result = Cli::try_parse_from([
        "logitrack",
        "register",
        "--package-code",
        "6123456789012",
        "--phone",
        "987654321",
        "--lat",
        "-12.05",
    ]);
    assert!(result.is_err());
}

#[test]
fn package_code_and_phone_are_required() {
    assert!(Cli::try_parse_from(["logitrack", "register"]).is_err());
    assert!(
        Cli::try_parse_from(["logitrack", "register", "--package-code", "6123456789012"]).is_err()
    );
}

#[test]
fn parses_locate() {
    let cli = Cli::try_parse_from(["logitrack", "locate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Locate));
}

#[test]
fn log_limit_defaults_to_ten() {
    let cli = Cli::try_parse_from(["logitrack", "log"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Log { limit: 10 }));
}

#[test]
fn log_limit_is_overridable() {
    let cli = Cli::try_parse_from(["logitrack", "log", "--limit", "3"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Log { limit: 3 }));
}

#[test]
fn a_subcommand_is_required() {
    assert!(Cli::try_parse_from(["logitrack"]).is_err());
}

#[test]
fn every_failure_kind_offers_the_manual_alternatives() {
    for kind in [
        LocationErrorKind::PermissionDenied,
        LocationErrorKind::PositionUnavailable,
        LocationErrorKind::Timeout,
        LocationErrorKind::Unknown,
    ] {
        let text = register::remediation(kind);
        assert!(text.contains("--pickup"), "{kind}: missing pickup hint");
        assert!(text.contains("--lat"), "{kind}: missing manual hint");
    }
}
