// tests/pipeline.rs

//! End-to-end tests: config bytes in, payload entries and RPM files out.

mod common;

use common::*;
use ign2rpm::packages::{S_IFDIR, S_IFLNK};
use ign2rpm::{entries_from_bytes, pack, pack_bytes, Error, FormatOrigin, Options};

#[test]
fn test_full_config_entry_order() {
    let (_, entries) =
        entries_from_bytes(IGNITION_FULL.as_bytes(), Options::new("full.ign"), PACK_TIME).unwrap();

    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/var/lib/app",
            "/etc/app.conf",
            "/var/usrlocal/bin/tool",
            "/usr/bin/tool",
            "/etc/systemd/system/app.service",
            "/etc/systemd/system/app.service.d/10-env.conf",
            "/var/home/core/.ssh/authorized_keys",
        ]
    );
    assert!(entries.iter().all(|e| e.mtime == PACK_TIME));
}

#[test]
fn test_full_config_entry_contents() {
    let (_, entries) =
        entries_from_bytes(IGNITION_FULL.as_bytes(), Options::new("full.ign"), PACK_TIME).unwrap();

    let dir = &entries[0];
    assert_eq!(dir.mode, 0o700 | S_IFDIR);
    assert_eq!(dir.owner, "app");
    assert_eq!(dir.group, "root");

    let conf = &entries[1];
    assert_eq!(conf.body, b"key=value\n");
    assert_eq!(conf.mode, 0o644);

    let tool = &entries[2];
    assert_eq!(tool.body, b"#!/bin/sh\n");
    assert_eq!(tool.mode, 0o755);

    let link = &entries[3];
    assert_eq!(link.body, b"/var/usrlocal/bin/tool-link");
    assert_eq!(link.mode, 0o755 | S_IFLNK);

    let keys = &entries[6];
    assert_eq!(keys.body, b"ssh-ed25519 AAAA-one\nssh-ed25519 AAAA-two\n");
    assert_eq!(keys.mode, 0o644);
    assert_eq!(keys.owner, "core");
    assert_eq!(keys.group, "core");
}

#[test]
fn test_translation_is_deterministic() {
    let first =
        entries_from_bytes(IGNITION_FULL.as_bytes(), Options::new("full.ign"), PACK_TIME).unwrap();
    let second =
        entries_from_bytes(IGNITION_FULL.as_bytes(), Options::new("full.ign"), PACK_TIME).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_exclude_prefix_only_skips_files() {
    let mut options = Options::new("full.ign");
    options.exclude_prefix = Some("/usr/local".to_string());

    let (_, entries) = entries_from_bytes(IGNITION_FULL.as_bytes(), options, PACK_TIME).unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();

    assert!(!paths.contains(&"/var/usrlocal/bin/tool"));
    // Links are not filtered
    assert!(paths.contains(&"/usr/bin/tool"));
    assert_eq!(entries.len(), 6);
}

#[test]
fn test_machine_config_names_output() {
    let (options, entries) = entries_from_bytes(
        MACHINE_CONFIG.as_bytes(),
        Options::new("mc.yaml"),
        PACK_TIME,
    )
    .unwrap();

    assert_eq!(options.output_name.as_deref(), Some("99-worker-motd"));
    assert_eq!(options.package_name(), "99-worker-motd");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/etc/motd");
    assert_eq!(entries[0].body, b"welcome\n");
    assert_eq!(entries[0].mode, 0o644);
}

#[test]
fn test_machine_config_keeps_explicit_output() {
    let mut options = Options::new("mc.yaml");
    options.output_name = Some("custom.rpm".to_string());

    let (options, _) = entries_from_bytes(MACHINE_CONFIG.as_bytes(), options, PACK_TIME).unwrap();
    assert_eq!(options.output_name.as_deref(), Some("custom.rpm"));
}

#[test]
fn test_machine_config_bad_payload() {
    let err = entries_from_bytes(
        MACHINE_CONFIG_BAD_PAYLOAD.as_bytes(),
        Options::new("mc.yaml"),
        PACK_TIME,
    )
    .unwrap_err();

    match err {
        Error::EnvelopeUnwrap { name, .. } => assert_eq!(name, "99-broken"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_butane_translation() {
    let (_, entries) =
        entries_from_bytes(BUTANE_FCOS.as_bytes(), Options::new("node.bu"), PACK_TIME).unwrap();

    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/etc/hostname",
            "/etc/systemd/system/hello.service",
            "/var/home/core/.ssh/authorized_keys",
        ]
    );
    assert_eq!(entries[0].body, b"node1");
    // 420 is read as octal digits
    assert_eq!(entries[0].mode, 0o420);
    assert_eq!(entries[2].body, b"ssh-ed25519 AAAA-butane\n");
}

#[test]
fn test_pack_local_file() {
    let (input_dir, input) = write_input("full.ign", IGNITION_FULL);
    let out_dir = tempfile::tempdir().unwrap();

    let mut options = options_into(&input, out_dir.path(), "full.rpm");
    options.allow_override = true;

    let result = pack(options).unwrap();
    assert_eq!(result.name, "full");
    assert_eq!(result.entries, 7);
    assert_eq!(result.path, out_dir.path().join("full.rpm"));
    assert_eq!(result.size, std::fs::metadata(&result.path).unwrap().len());

    let package = rpm::Package::open(&result.path).unwrap();
    assert_eq!(package.metadata.get_name().unwrap(), "full");
    assert_eq!(package.metadata.get_version().unwrap(), "1");
    assert_eq!(package.metadata.get_release().unwrap(), "1");
    assert_eq!(package.metadata.get_arch().unwrap(), "noarch");

    let provides = package.metadata.get_provides().unwrap();
    assert!(provides.iter().any(|p| p.name == "rpmostree(override)"));

    let files = package.metadata.get_file_entries().unwrap();
    assert_eq!(files.len(), 7);

    drop(input_dir);
}

#[test]
fn test_machine_config_default_output_path() {
    let (options, _) = entries_from_bytes(
        MACHINE_CONFIG.as_bytes(),
        Options::new("/srv/configs/mc.yaml"),
        PACK_TIME,
    )
    .unwrap();

    assert_eq!(
        options.output_path(),
        std::path::PathBuf::from("99-worker-motd.rpm")
    );
}

#[test]
fn test_pack_missing_input() {
    let out_dir = tempfile::tempdir().unwrap();
    let input = out_dir.path().join("missing.ign");
    let options = options_into(&input, out_dir.path(), "missing.rpm");

    let err = pack(options).unwrap_err();
    assert!(matches!(err, Error::InputAcquisition { .. }));
    assert!(!out_dir.path().join("missing.rpm").exists());
}

#[test]
fn test_pack_unrecognized_input_writes_nothing() {
    let (input_dir, input) = write_input("junk.txt", "just some text\n");
    let options = options_into(&input, input_dir.path(), "junk.rpm");

    let err = pack(options).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedFormat { .. }));
    assert!(!input_dir.path().join("junk.rpm").exists());
}

#[test]
fn test_butane_octal_mode_packs() {
    let out_dir = tempfile::tempdir().unwrap();
    let mut options = Options::new("motd.bu");
    options.output_name = Some(out_dir.path().join("motd.rpm").display().to_string());

    let (_, entries) =
        entries_from_bytes(BUTANE_OCTAL_MODE.as_bytes(), options.clone(), PACK_TIME).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].body, b"hi");
    // 0644 reaches the config as 420, whose digits are then read as octal
    assert_eq!(entries[0].mode, 0o420);

    let result = pack_bytes(
        BUTANE_OCTAL_MODE.as_bytes(),
        FormatOrigin::Local,
        options,
        PACK_TIME,
    )
    .unwrap();
    assert!(result.path.exists());

    let package = rpm::Package::open(&result.path).unwrap();
    let files = package.metadata.get_file_entries().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(u32::from(files[0].modified_at), PACK_TIME);
}

#[test]
fn test_unit_name_outside_units_dir_rejected() {
    let raw = br#"{"ignition": {"version": "3.2.0"},
        "systemd": {"units": [{"name": "/etc/shadow", "contents": "x"}]}}"#;

    let err = entries_from_bytes(raw, Options::new("evil.ign"), PACK_TIME).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}
