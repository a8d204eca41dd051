//! OS-facing identity lookups.
//!
//! The cluster resolves the current user (for `user@host` ssh targets) and the
//! local hostname once, at construction, through this trait so tests can pin both.

use std::io;

pub trait SystemEnvironment: Send + Sync {
    fn current_user(&self) -> io::Result<String>;
    fn hostname(&self) -> io::Result<String>;
}

/// Reads identity from the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnvironment;

impl SystemEnvironment for OsEnvironment {
    fn current_user(&self) -> io::Result<String> {
        let uid = nix::unistd::getuid();
        match nix::unistd::User::from_uid(uid) {
            Ok(Some(user)) => Ok(user.name),
            // Containers often run with a uid that has no passwd entry
            Ok(None) => std::env::var("USER").map_err(|_| {
                io::Error::new(io::ErrorKind::NotFound, format!("no user entry for uid {uid}"))
            }),
            Err(errno) => Err(io::Error::from_raw_os_error(errno as i32)),
        }
    }

    fn hostname(&self) -> io::Result<String> {
        Ok(hostname::get()?.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_environment_resolves_hostname() {
        let hostname = OsEnvironment.hostname().unwrap();
        assert!(!hostname.is_empty());
    }
}
