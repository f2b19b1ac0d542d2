//! Platform wrapper around opening, resolving and closing a shared library.

use std::path::Path;
use std::path::PathBuf;

use libloading::Library;

use crate::error::ProbeError;
use crate::symbols::SymbolSource;

/// A shared library opened by path.
///
/// The library stays loaded until [`DynamicLibrary::close`] is called or the
/// value is dropped.
#[derive(Debug)]
pub struct DynamicLibrary {
    path: PathBuf,
    library: Option<Library>,
}

impl DynamicLibrary {
    /// Opens the library with lazy binding, so unresolved references inside
    /// the library itself only fail once they are called.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let path = path.as_ref().to_path_buf();
        let library = unsafe { open_lazy(&path) }.map_err(|source| ProbeError::Load {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "opened dynamic library");
        Ok(Self {
            path,
            library: Some(library),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.library.is_some()
    }
}

impl SymbolSource for DynamicLibrary {
    unsafe fn resolve<T: Copy>(&self, name: &str) -> Result<T, ProbeError> {
        let Some(library) = self.library.as_ref() else {
            return Err(ProbeError::Symbol {
                symbol: name.to_string(),
                reason: format!("{} is not loaded", self.path.display()),
            });
        };

        let symbol = library
            .get::<T>(name.as_bytes())
            .map_err(|err| ProbeError::Symbol {
                symbol: name.to_string(),
                reason: err.to_string(),
            })?;
        tracing::trace!("resolved {name}");
        Ok(*symbol)
    }

    fn close(&mut self) {
        let Some(library) = self.library.take() else {
            return;
        };
        match library.close() {
            Ok(()) => tracing::debug!(path = %self.path.display(), "closed dynamic library"),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to close library: {err}")
            }
        }
    }
}

#[cfg(unix)]
unsafe fn open_lazy(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::Library as UnixLibrary;
    use libloading::os::unix::RTLD_LAZY;
    use libloading::os::unix::RTLD_LOCAL;

    UnixLibrary::open(Some(path), RTLD_LAZY | RTLD_LOCAL).map(Library::from)
}

#[cfg(windows)]
unsafe fn open_lazy(path: &Path) -> Result<Library, libloading::Error> {
    Library::new(path)
}
