use std::path::PathBuf;

use regimport_common::{
    container::ContainerError, identity::IdentityError, registry::RegistryError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("container error: {0}")]
    Container(#[from] ContainerError),
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file name is not valid unicode: {0}")]
    InvalidFileName(PathBuf),

    #[error("error: {0}")]
    Other(#[from] anyhow::Error),
}
