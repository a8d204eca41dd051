use gpfleet_kernel::SystemEnvironment;
use std::io;

/// Identity fixed at construction. `None` makes the lookup fail.
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    pub user: Option<String>,
    pub hostname: Option<String>,
}

impl StaticEnvironment {
    pub fn new(user: &str, hostname: &str) -> Self {
        Self {
            user: Some(user.to_string()),
            hostname: Some(hostname.to_string()),
        }
    }

    /// `testUser` on `testHost`
    pub fn test() -> Self {
        Self::new("testUser", "testHost")
    }

    pub fn without_user(mut self) -> Self {
        self.user = None;
        self
    }
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self::test()
    }
}

impl SystemEnvironment for StaticEnvironment {
    fn current_user(&self) -> io::Result<String> {
        self.user
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no current user"))
    }

    fn hostname(&self) -> io::Result<String> {
        self.hostname
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no hostname"))
    }
}
