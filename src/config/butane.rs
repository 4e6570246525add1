// src/config/butane.rs

//! Butane document translation
//!
//! Butane is a YAML authoring format that compiles down to Ignition. Each
//! document names a `variant` and `version`; only combinations that
//! translate to Ignition 3.2.0 or earlier are accepted, and those two
//! fields are checked before anything else in the document is looked at so
//! the user gets an actionable message instead of a schema error.
//!
//! Translation always produces raw Ignition, even for the `openshift`
//! variant which could otherwise emit a MachineConfig. Unknown keys are
//! refused, as are sections (disks, filesystems, trees, kernel arguments
//! and the like) whose effect cannot be expressed as packaged files.

use super::{
    dataurl, parse_and_convert, Config, Directory, Dropin, File, IgnitionSection, Link,
    NodeOwner, Passwd, Resource, Storage, Systemd, Unit, User,
};
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

/// Accepted variants, each with its versions and the Ignition spec they emit
///
/// Kept sorted by variant and version so error listings are stable.
const SUPPORTED: &[(&str, &[(&str, &str)])] = &[
    (
        "fcos",
        &[
            ("1.0.0", "3.0.0"),
            ("1.1.0", "3.1.0"),
            ("1.2.0", "3.2.0"),
            ("1.3.0", "3.2.0"),
        ],
    ),
    ("openshift", &[("4.8.0", "3.2.0"), ("4.9.0", "3.2.0")]),
    ("rhcos", &[("0.1.0", "3.2.0")]),
];

/// The `variant`/`version` pair of a Butane document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    pub variant: String,
    pub version: String,
}

impl Discriminator {
    /// Read only the two discriminator fields, ignoring the rest
    pub fn probe(raw: &[u8]) -> Result<Self> {
        let doc: Value = serde_yaml::from_slice(raw)
            .map_err(|e| Error::Parse(format!("Failed to parse butane config: {e}")))?;

        Ok(Self {
            variant: scalar_field(&doc, "variant"),
            version: scalar_field(&doc, "version"),
        })
    }

    /// Check against the allow-list, returning the Ignition version it emits
    pub fn check(&self) -> Result<&'static str> {
        let Some((_, versions)) = SUPPORTED.iter().find(|(v, _)| *v == self.variant) else {
            return Err(Error::UnsupportedVariant {
                variant: self.variant.clone(),
                supported: supported_variants().join(", "),
            });
        };

        versions
            .iter()
            .find(|(v, _)| *v == self.version)
            .map(|(_, ignition)| *ignition)
            .ok_or_else(|| Error::UnsupportedVersion {
                variant: self.variant.clone(),
                version: self.version.clone(),
                supported: supported_versions(&self.variant).join(", "),
            })
    }
}

fn scalar_field(doc: &Value, key: &str) -> String {
    match doc.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// All accepted variants, sorted
pub fn supported_variants() -> Vec<&'static str> {
    let mut variants: Vec<_> = SUPPORTED.iter().map(|(v, _)| *v).collect();
    variants.sort_unstable();
    variants
}

/// Accepted versions of one variant, sorted; empty for unknown variants
pub fn supported_versions(variant: &str) -> Vec<&'static str> {
    let mut versions: Vec<_> = SUPPORTED
        .iter()
        .filter(|(v, _)| *v == variant)
        .flat_map(|(_, versions)| versions.iter().map(|(version, _)| *version))
        .collect();
    versions.sort_unstable();
    versions
}

/// Gate on the discriminator, translate, and decode the resulting Ignition
pub fn parse_butane(raw: &[u8]) -> Result<Config> {
    let discriminator = Discriminator::probe(raw)?;
    let ignition_version = discriminator.check()?;
    debug!(
        "Translating butane {} {} to ignition {}",
        discriminator.variant, discriminator.version, ignition_version
    );

    let ignition = translate_bytes(raw, ignition_version)?;
    parse_and_convert(&ignition)
}

/// Translate a Butane document into raw Ignition JSON
pub fn translate_bytes(raw: &[u8], ignition_version: &str) -> Result<Vec<u8>> {
    let doc: ButaneConfig = serde_yaml::from_slice(raw)
        .map_err(|e| Error::Parse(format!("Failed to translate butane config: {e}")))?;

    let config = doc.into_ignition(ignition_version)?;
    serde_json::to_vec(&config)
        .map_err(|e| Error::Parse(format!("Failed to encode translated ignition: {e}")))
}

/// Reject a section raw Ignition output cannot carry into a package
fn reject_section(section: &str, value: &Option<Value>) -> Result<()> {
    let present = match value {
        None | Some(Value::Null) => false,
        Some(Value::Mapping(m)) => !m.is_empty(),
        Some(Value::Sequence(s)) => !s.is_empty(),
        Some(_) => true,
    };

    if present {
        return Err(Error::InvalidConfig(format!(
            "{section} is not supported when packing to an RPM"
        )));
    }
    Ok(())
}

/// Butane modes are octal: `0644` arrives as a string, `0o644` as a number
fn deserialize_mode<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMode {
        Number(u32),
        Text(String),
    }

    match Option::<RawMode>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMode::Number(mode)) => Ok(Some(mode)),
        Some(RawMode::Text(text)) => parse_octal_mode(&text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid mode {text:?}"))),
    }
}

fn parse_octal_mode(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0o")
        .or_else(|| text.strip_prefix('0'))?;
    if digits.is_empty() {
        return Some(0);
    }
    u32::from_str_radix(digits, 8).ok()
}

// Fields that are accepted but have no effect on the package are kept as
// raw values so unknown keys can still be refused.

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneConfig {
    #[serde(default)]
    #[allow(dead_code)]
    variant: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    version: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    metadata: Option<Value>,
    #[serde(default)]
    ignition: Option<Value>,
    #[serde(default)]
    openshift: Option<Value>,
    #[serde(default)]
    boot_device: Option<Value>,
    #[serde(default)]
    kernel_arguments: Option<Value>,
    #[serde(default)]
    grub: Option<Value>,
    #[serde(default)]
    passwd: ButanePasswd,
    #[serde(default)]
    storage: ButaneStorage,
    #[serde(default)]
    systemd: ButaneSystemd,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ButanePasswd {
    #[serde(default)]
    users: Vec<ButaneUser>,
    #[serde(default)]
    groups: Option<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct ButaneUser {
    name: String,
    #[serde(default)]
    ssh_authorized_keys: Vec<String>,
    #[serde(default)]
    password_hash: Option<Value>,
    #[serde(default)]
    uid: Option<Value>,
    #[serde(default)]
    gecos: Option<Value>,
    #[serde(default)]
    home_dir: Option<Value>,
    #[serde(default)]
    no_create_home: Option<Value>,
    #[serde(default)]
    primary_group: Option<Value>,
    #[serde(default)]
    groups: Option<Value>,
    #[serde(default)]
    no_user_group: Option<Value>,
    #[serde(default)]
    no_log_init: Option<Value>,
    #[serde(default)]
    shell: Option<Value>,
    #[serde(default)]
    should_exist: Option<Value>,
    #[serde(default)]
    system: Option<Value>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneStorage {
    #[serde(default)]
    directories: Vec<ButaneDirectory>,
    #[serde(default)]
    files: Vec<ButaneFile>,
    #[serde(default)]
    links: Vec<ButaneLink>,
    #[serde(default)]
    disks: Option<Value>,
    #[serde(default)]
    raid: Option<Value>,
    #[serde(default)]
    filesystems: Option<Value>,
    #[serde(default)]
    luks: Option<Value>,
    #[serde(default)]
    trees: Option<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneDirectory {
    path: String,
    #[serde(default)]
    user: NodeOwner,
    #[serde(default)]
    group: NodeOwner,
    #[serde(default, deserialize_with = "deserialize_mode")]
    mode: Option<u32>,
    #[serde(default)]
    #[allow(dead_code)]
    overwrite: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneFile {
    path: String,
    #[serde(default)]
    user: NodeOwner,
    #[serde(default)]
    group: NodeOwner,
    #[serde(default, deserialize_with = "deserialize_mode")]
    mode: Option<u32>,
    #[serde(default)]
    contents: Option<ButaneResource>,
    #[serde(default)]
    append: Vec<ButaneResource>,
    #[serde(default)]
    #[allow(dead_code)]
    overwrite: Option<bool>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneResource {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    inline: Option<String>,
    #[serde(default)]
    local: Option<String>,
    #[serde(default)]
    compression: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    verification: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    http_headers: Option<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneLink {
    path: String,
    #[serde(default)]
    user: NodeOwner,
    #[serde(default)]
    group: NodeOwner,
    target: String,
    #[serde(default)]
    hard: Option<bool>,
    #[serde(default)]
    #[allow(dead_code)]
    overwrite: Option<bool>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneSystemd {
    #[serde(default)]
    units: Vec<ButaneUnit>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneUnit {
    name: String,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    mask: Option<bool>,
    #[serde(default)]
    contents: Option<String>,
    #[serde(default)]
    dropins: Vec<ButaneDropin>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ButaneDropin {
    name: String,
    #[serde(default)]
    contents: Option<String>,
}

impl ButaneResource {
    fn into_resource(self, path: &str) -> Result<Resource> {
        if self.local.is_some() {
            return Err(Error::InvalidConfig(format!(
                "{path}: contents.local requires a files directory, which is not supported"
            )));
        }

        match (self.inline, self.source) {
            (Some(_), Some(_)) => Err(Error::InvalidConfig(format!(
                "{path}: contents.inline and contents.source are mutually exclusive"
            ))),
            (Some(inline), None) => Ok(Resource {
                source: Some(dataurl::encode(inline.as_bytes())),
                compression: None,
            }),
            (None, source) => Ok(Resource {
                source,
                compression: self.compression,
            }),
        }
    }
}

impl ButaneConfig {
    /// Refuse sections that have no place in a package
    fn check_sections(&self) -> Result<()> {
        reject_section("ignition", &self.ignition)?;
        reject_section("openshift", &self.openshift)?;
        reject_section("boot_device", &self.boot_device)?;
        reject_section("kernel_arguments", &self.kernel_arguments)?;
        reject_section("grub", &self.grub)?;
        reject_section("passwd.groups", &self.passwd.groups)?;
        reject_section("storage.disks", &self.storage.disks)?;
        reject_section("storage.raid", &self.storage.raid)?;
        reject_section("storage.filesystems", &self.storage.filesystems)?;
        reject_section("storage.luks", &self.storage.luks)?;
        reject_section("storage.trees", &self.storage.trees)?;

        if let Some(unit) = self.systemd.units.iter().find(|u| u.mask == Some(true)) {
            return Err(Error::InvalidConfig(format!(
                "{}: masking units is not supported when packing to an RPM",
                unit.name
            )));
        }
        Ok(())
    }

    fn into_ignition(self, version: &str) -> Result<Config> {
        self.check_sections()?;

        let users = self
            .passwd
            .users
            .into_iter()
            .map(|u| User {
                name: u.name,
                ssh_authorized_keys: u.ssh_authorized_keys,
            })
            .collect();

        let directories = self
            .storage
            .directories
            .into_iter()
            .map(|d| Directory {
                path: d.path,
                user: d.user,
                group: d.group,
                mode: d.mode,
            })
            .collect();

        let mut files = Vec::with_capacity(self.storage.files.len());
        for f in self.storage.files {
            let contents = match f.contents {
                Some(contents) => contents.into_resource(&f.path)?,
                None => Resource::default(),
            };
            let append = f
                .append
                .into_iter()
                .map(|a| a.into_resource(&f.path))
                .collect::<Result<Vec<_>>>()?;

            files.push(File {
                path: f.path,
                user: f.user,
                group: f.group,
                mode: f.mode,
                contents,
                append,
            });
        }

        let links = self
            .storage
            .links
            .into_iter()
            .map(|l| Link {
                path: l.path,
                user: l.user,
                group: l.group,
                target: l.target,
                hard: l.hard,
            })
            .collect();

        let units = self
            .systemd
            .units
            .into_iter()
            .map(|u| Unit {
                name: u.name,
                enabled: u.enabled,
                contents: u.contents,
                dropins: u
                    .dropins
                    .into_iter()
                    .map(|d| Dropin {
                        name: d.name,
                        contents: d.contents,
                    })
                    .collect(),
            })
            .collect();

        Ok(Config {
            ignition: IgnitionSection {
                version: version.to_string(),
            },
            passwd: Passwd { users },
            storage: Storage {
                directories,
                files,
                links,
            },
            systemd: Systemd { units },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_lists_alternatives() {
        let err = parse_butane(b"variant: fcos\nversion: 9.9.9\n").unwrap_err();
        match err {
            Error::UnsupportedVersion {
                variant,
                version,
                supported,
            } => {
                assert_eq!(variant, "fcos");
                assert_eq!(version, "9.9.9");
                assert_eq!(supported, "1.0.0, 1.1.0, 1.2.0, 1.3.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_variant_lists_variants() {
        let err = parse_butane(b"variant: flatcar\nversion: 1.0.0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVariant { ref supported, .. } if supported == "fcos, openshift, rhcos"
        ));
    }

    #[test]
    fn test_discriminator_ignores_rest_of_document() {
        // storage.files is malformed, but only variant/version are probed
        let d = Discriminator::probe(b"variant: rhcos\nversion: 0.1.0\nstorage:\n  files: 7\n")
            .unwrap();
        assert_eq!(d.check().unwrap(), "3.2.0");
    }

    #[test]
    fn test_translate_inline_contents() {
        let raw = br#"
variant: fcos
version: 1.3.0
passwd:
  users:
    - name: core
      ssh_authorized_keys:
        - ssh-rsa AAAA
storage:
  files:
    - path: /etc/motd
      mode: 0644
      contents:
        inline: "hello world\n"
  links:
    - path: /etc/localtime
      target: ../usr/share/zoneinfo/UTC
systemd:
  units:
    - name: hello.service
      enabled: true
      contents: "[Unit]\nDescription=hi\n"
"#;

        let config = parse_butane(raw).unwrap();
        assert_eq!(config.ignition.version, "3.2.0");
        assert_eq!(config.storage.files[0].mode, Some(0o644));
        assert_eq!(config.passwd.users[0].ssh_authorized_keys, vec!["ssh-rsa AAAA"]);

        let source = config.storage.files[0].contents.source.as_deref().unwrap();
        assert_eq!(dataurl::decode(source).unwrap(), b"hello world\n");
        assert_eq!(config.storage.links[0].target, "../usr/share/zoneinfo/UTC");
        assert_eq!(config.systemd.units[0].enabled, Some(true));
    }

    #[test]
    fn test_fcos_1_0_emits_ignition_3_0() {
        let ignition = translate_bytes(b"variant: fcos\nversion: 1.0.0\n", "3.0.0").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&ignition).unwrap();
        assert_eq!(value["ignition"]["version"], "3.0.0");
    }

    #[test]
    fn test_local_contents_rejected() {
        let raw = b"variant: fcos\nversion: 1.2.0\nstorage:\n  files:\n    - path: /x\n      contents:\n        local: x.txt\n";
        assert!(matches!(parse_butane(raw), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_octal_modes() {
        let raw = b"variant: fcos\nversion: 1.3.0\nstorage:\n  files:\n    - path: /a\n      mode: 0644\n    - path: /b\n      mode: 0o755\n    - path: /c\n      mode: 420\n  directories:\n    - path: /d\n      mode: 0700\n";
        let config = parse_butane(raw).unwrap();

        let modes: Vec<_> = config.storage.files.iter().map(|f| f.mode).collect();
        assert_eq!(modes, vec![Some(0o644), Some(0o755), Some(420)]);
        assert_eq!(config.storage.directories[0].mode, Some(0o700));
    }

    #[test]
    fn test_bad_octal_mode_rejected() {
        let raw = b"variant: fcos\nversion: 1.3.0\nstorage:\n  files:\n    - path: /a\n      mode: \"0999\"\n";
        assert!(matches!(parse_butane(raw), Err(Error::Parse(_))));
        assert_eq!(parse_octal_mode("0"), Some(0));
        assert_eq!(parse_octal_mode("644"), None);
    }

    #[test]
    fn test_misspelled_key_rejected() {
        let raw = b"variant: fcos\nversion: 1.3.0\nstorage:\n  fils:\n    - path: /a\n";
        assert!(matches!(parse_butane(raw), Err(Error::Parse(_))));

        let raw = b"variant: fcos\nversion: 1.3.0\nsystemd:\n  units:\n    - name: a.service\n      enable: true\n";
        assert!(matches!(parse_butane(raw), Err(Error::Parse(_))));
    }

    #[test]
    fn test_openshift_kernel_arguments_rejected() {
        let raw = b"variant: openshift\nversion: 4.9.0\nmetadata:\n  name: 99-worker\n  labels:\n    machineconfiguration.openshift.io/role: worker\nopenshift:\n  kernel_arguments:\n    - loglevel=7\n";
        match parse_butane(raw) {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("openshift")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_metadata_allowed() {
        let raw = b"variant: openshift\nversion: 4.9.0\nmetadata:\n  name: 99-worker\n";
        assert!(parse_butane(raw).is_ok());
    }

    #[test]
    fn test_storage_trees_rejected() {
        let raw = b"variant: fcos\nversion: 1.3.0\nstorage:\n  trees:\n    - local: overlay\n";
        match parse_butane(raw) {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("storage.trees")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_filesystems_and_groups_rejected() {
        let raw = b"variant: fcos\nversion: 1.3.0\nstorage:\n  filesystems:\n    - device: /dev/vdb\n      format: xfs\n";
        assert!(matches!(parse_butane(raw), Err(Error::InvalidConfig(_))));

        let raw = b"variant: fcos\nversion: 1.3.0\npasswd:\n  groups:\n    - name: admins\n";
        assert!(matches!(parse_butane(raw), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_masked_unit_rejected() {
        let raw = b"variant: fcos\nversion: 1.3.0\nsystemd:\n  units:\n    - name: zincati.service\n      mask: true\n";
        assert!(matches!(parse_butane(raw), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_ignored_user_fields_accepted() {
        let raw = b"variant: fcos\nversion: 1.3.0\npasswd:\n  users:\n    - name: core\n      groups: [wheel]\n      password_hash: x\n      ssh_authorized_keys: [k1]\n";
        let config = parse_butane(raw).unwrap();
        assert_eq!(config.passwd.users[0].ssh_authorized_keys, vec!["k1"]);
    }
}
