use std::env;

use client::Session;

struct VersionInfo {
    name: &'static str,
    version: &'static str,
    os: &'static str,
    architecture: &'static str,
    session_file: String,
}

pub fn run() {
    let info = VersionInfo {
        name: clap::crate_name!(),
        version: clap::crate_version!(),
        os: env::consts::OS,
        architecture: env::consts::ARCH,
        session_file: Session::default_path()
            .map_or_else(|| "unavailable".to_owned(), |p| p.display().to_string()),
    };

    println!("Name           : {}", info.name);
    println!("Version        : {}", info.version);
    println!("OS             : {}", info.os);
    println!("Architecture   : {}", info.architecture);
    println!("Session file   : {}", info.session_file);
}
