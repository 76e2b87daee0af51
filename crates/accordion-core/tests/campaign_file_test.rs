//! Integration tests for loading campaign files from disk.

use std::io::Write;

use accordion_core::campaign::{CampaignFileError, CampaignToml, load_campaign};
use accordion_core::{AnchorMode, Catalog};
use accordion_test_utils::{date, store};

fn write_campaign(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn load_and_generate_from_file() {
    let file = write_campaign(
        r#"
[campaign]
name = "Autumn push"
anchor_mode = "backward_offset"

[[assets]]
category = "Print"
platform = "Daily Mail"
asset = "Full Page"
date = "2026-11-05"

[[assets]]
category = "Mobile"
platform = "MailPlus App"
asset = "Banner Ad"
date = "2026-10-21"

[[assets]]
category = "Video"
platform = "Social Video"
asset = "LinkedIn Video"
"#,
    );

    let campaign = CampaignToml::load(file.path(), &Catalog::builtin()).unwrap();
    let mut store = store();
    let ids = load_campaign(&campaign, &mut store);
    assert_eq!(ids.len(), 3);
    assert_eq!(store.mode(), AnchorMode::BackwardOffset);
    assert_eq!(
        store.state().asset(ids[0]).unwrap().anchor_date,
        Some(date(2026, 11, 5))
    );
    assert!(store.state().asset(ids[2]).unwrap().anchor_date.is_none());

    let state = store.generate_schedule();
    assert_eq!(state.task_count(), 8);
    assert_eq!(state.conflicts.len(), 1);
    assert_eq!(state.conflicts[0].asset_label, "Banner Ad");
}

#[test]
fn file_without_mode_keeps_store_mode() {
    let file = write_campaign(
        r#"
[[assets]]
category = "Digital"
platform = "Newsletter"
asset = "Travel Database"
"#,
    );
    let campaign = CampaignToml::load(file.path(), &Catalog::builtin()).unwrap();
    let mut store = store();
    load_campaign(&campaign, &mut store);
    assert_eq!(store.mode(), AnchorMode::ForwardChaining);
}

#[test]
fn missing_file_reports_path() {
    let err = CampaignToml::load(
        std::path::Path::new("/nonexistent/campaign.toml"),
        &Catalog::builtin(),
    )
    .unwrap_err();
    assert!(matches!(err, CampaignFileError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("/nonexistent/campaign.toml"));
}

#[test]
fn unknown_asset_is_reported_with_position() {
    let file = write_campaign(
        r#"
[[assets]]
category = "Print"
platform = "Daily Mail"
asset = "Full Page"

[[assets]]
category = "Print"
platform = "Daily Mail"
asset = "Quarter Page"
"#,
    );
    let err = CampaignToml::load(file.path(), &Catalog::builtin()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "asset #2: unknown asset \"Quarter Page\" on platform \"Daily Mail\""
    );
}

#[test]
fn bad_date_is_a_parse_error() {
    let file = write_campaign(
        r#"
[[assets]]
category = "Print"
platform = "Daily Mail"
asset = "Full Page"
date = "next tuesday"
"#,
    );
    let err = CampaignToml::load(file.path(), &Catalog::builtin()).unwrap_err();
    assert!(matches!(err, CampaignFileError::TomlError(_)), "got: {err}");
}
