use clap::Parser;
use regimport::{command::Cli, error::Error, import};
use regimport_common::{
    container::KeyContainer,
    identity::{self, Sid},
    registry::{self, RegistryError},
    telemetry::StdoutTelemetry,
};
use tracing::{error, info};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            if err.use_stderr() {
                // clap would exit 2 here; keep the historical usage exit code
                std::process::exit(1);
            }
            return;
        }
    };

    StdoutTelemetry::default().init();

    if let Err(err) = run(cli) {
        error!("import failed: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    info!("using key directory {}", cli.dir.display());
    let container = KeyContainer::open(&cli.dir)?;

    let sid = match cli.sid {
        Some(sid) => Sid::from(sid),
        None => identity::current_user_sid()?,
    };
    info!("using sid {sid}");

    let key_name = container.key_name()?;
    info!("using key name {key_name}");

    let path = registry::user_keys_path(&sid, &key_name);
    info!(r"using regkey HKLM\{path}");

    let mut store = open_store(&path)?;
    let imported = import::import_container(&container, &mut store)?;
    info!("imported {imported} value(s)");

    Ok(())
}

#[cfg(windows)]
fn open_store(path: &str) -> Result<registry::windows::RegistryStore, RegistryError> {
    registry::windows::RegistryStore::create_under_hklm(path)
}

#[cfg(not(windows))]
fn open_store(_path: &str) -> Result<registry::memory::MemoryStore, RegistryError> {
    Err(RegistryError::Unsupported)
}
