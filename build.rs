// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: version tree root
fn root_arg() -> Arg {
    Arg::new("root")
        .short('r')
        .long("root")
        .value_name("DIR")
        .help("Root of the version tree (default: $ROOT_PATH, then the current directory)")
}

/// Common argument: snapshot file
fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .long("snapshot")
        .value_name("FILE")
        .help("Snapshot file for the upstream listing")
}

/// Common argument: disable snapshots
fn no_snapshot_arg() -> Arg {
    Arg::new("no_snapshot")
        .long("no-snapshot")
        .action(ArgAction::SetTrue)
        .help("Always fetch the upstream listing and do not store a snapshot")
}

fn build_cli() -> Command {
    Command::new("vertree")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Vertree Contributors")
        .about("Materialize upstream releases as a tree of Nix expressions")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (overridden by RUST_LOG)"),
        )
        .subcommand(
            Command::new("github")
                .about("Materialize releases from GitHub tags")
                .arg(Arg::new("owner").long("owner").default_value("ruby").help("Repository owner"))
                .arg(Arg::new("repo").long("repo").default_value("ruby").help("Repository name"))
                .arg(
                    Arg::new("api")
                        .long("api")
                        .default_value("https://api.github.com")
                        .help("GitHub API endpoint"),
                )
                .arg(Arg::new("token").long("token").help("API token (default: $GITHUB_API_TOKEN)"))
                .arg(root_arg())
                .arg(snapshot_arg())
                .arg(no_snapshot_arg()),
        )
        .subcommand(
            Command::new("checksums")
                .about("Materialize releases listed in a checksum manifest")
                .arg(Arg::new("url").long("url").required(true).help("URL of the manifest"))
                .arg(
                    Arg::new("base_url")
                        .long("base-url")
                        .required(true)
                        .help("URL the archive file names are relative to"),
                )
                .arg(Arg::new("project").long("project").default_value("ruby").help("Project name prefix"))
                .arg(Arg::new("suffix").long("suffix").default_value(".tar.gz").help("Archive suffix"))
                .arg(root_arg())
                .arg(snapshot_arg())
                .arg(no_snapshot_arg()),
        )
        .subcommand(
            Command::new("reindex")
                .about("Regenerate every default.nix in an existing tree")
                .long_about(
                    "Regenerate every default.nix in an existing tree. Writes into every \
                     directory under the root except hidden ones such as .git.",
                )
                .arg(root_arg()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Show the version path an identifier resolves to")
                .arg(Arg::new("identifier").required(true).help("Tag name or archive file name"))
                .arg(
                    Arg::new("filename")
                        .long("filename")
                        .action(ArgAction::SetTrue)
                        .help("Treat the identifier as an archive file name"),
                )
                .arg(Arg::new("project").long("project").default_value("ruby").help("Project name prefix"))
                .arg(Arg::new("suffix").long("suffix").default_value(".tar.gz").help("Archive suffix")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
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

    let man_path = man_dir.join("vertree.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
