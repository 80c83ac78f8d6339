use bugreport::{
    bugreport,
    collector::{CompileTimeInformation, EnvironmentVariables, OperatingSystem, SoftwareVersion},
    format::Markdown,
};

use super::{SESSION_ENV, URI_ENV};

pub fn run() {
    bugreport!()
        .info(SoftwareVersion::default())
        .info(OperatingSystem::default())
        .info(EnvironmentVariables::list(&[
            "SHELL", "TERM", "RUST_LOG", URI_ENV, SESSION_ENV,
        ]))
        .info(CompileTimeInformation::default())
        .print::<Markdown>();
}
