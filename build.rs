// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("ignition2rpm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pack an Ignition config, MachineConfig or Butane document into an RPM")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH|URL")
                .required(true)
                .help("Path or http(s) URL of the config to pack"),
        )
        .arg(
            Arg::new("exclude_prefix")
                .short('e')
                .long("exclude-prefix")
                .value_name("PREFIX")
                .help("Skip every entity whose path starts with this prefix"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file name (defaults to <input name>.rpm)"),
        )
        .arg(
            Arg::new("can_override")
                .long("can-override")
                .action(ArgAction::SetTrue)
                .help("Let the package replace files owned by other packages on rpm-ostree systems"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("ignition2rpm.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
