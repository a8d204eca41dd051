//! Command vector construction.
//!
//! Vectors are passed to the executor as argv, never re-parsed by a shell on
//! the master. The remote form hands the inner command to ssh as a single
//! argument, so it is interpreted once, by the remote login shell.

use crate::cluster::Cluster;
use crate::output::CommandMap;
use crate::scope::MASTER_CONTENT_ID;

/// `ssh -o StrictHostKeyChecking=no <user>@<host> <command>`
pub fn construct_ssh_command(user: &str, host: &str, command: &str) -> Vec<String> {
    vec![
        "ssh".to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        format!("{user}@{host}"),
        command.to_string(),
    ]
}

/// `bash -c <command>`
pub fn construct_local_command(command: &str) -> Vec<String> {
    vec!["bash".to_string(), "-c".to_string(), command.to_string()]
}

impl Cluster {
    pub fn construct_ssh_command(&self, host: &str, command: &str) -> Vec<String> {
        construct_ssh_command(self.user(), host, command)
    }

    /// The master is never reached over ssh from itself
    fn remote_or_local(&self, content_id: i32, host: &str, command: &str) -> Vec<String> {
        if content_id == MASTER_CONTENT_ID {
            construct_local_command(command)
        } else {
            self.construct_ssh_command(host, command)
        }
    }

    fn selected_contents(&self, include_master: bool) -> impl Iterator<Item = i32> {
        self.topology()
            .content_ids()
            .into_iter()
            .filter(move |&id| include_master || id != MASTER_CONTENT_ID)
    }

    /// One ssh command per segment, keyed by content id
    pub fn generate_ssh_command_map_for_segments<F>(&self, include_master: bool, generator: F) -> CommandMap
    where
        F: Fn(i32) -> String,
    {
        self.topology()
            .segments()
            .filter(|seg| include_master || !seg.is_master())
            .map(|seg| {
                let content_id = seg.content_id;
                (content_id, self.remote_or_local(content_id, &seg.hostname, &generator(content_id)))
            })
            .collect()
    }

    /// One ssh command per host, keyed by the host's representative content id
    pub fn generate_ssh_command_map_for_hosts<F>(&self, include_master: bool, generator: F) -> CommandMap
    where
        F: Fn(i32) -> String,
    {
        self.topology()
            .representative_host_map(include_master)
            .into_iter()
            .map(|(host, content_id)| (content_id, self.remote_or_local(content_id, &host, &generator(content_id))))
            .collect()
    }

    /// One local command per segment, run on the master on each segment's behalf
    pub fn generate_local_command_map_for_segments<F>(&self, include_master: bool, generator: F) -> CommandMap
    where
        F: Fn(i32) -> String,
    {
        self.selected_contents(include_master)
            .map(|content_id| (content_id, construct_local_command(&generator(content_id))))
            .collect()
    }

    /// One local command per host, run on the master on each host's behalf
    pub fn generate_local_command_map_for_hosts<F>(&self, include_master: bool, generator: F) -> CommandMap
    where
        F: Fn(i32) -> String,
    {
        self.topology()
            .representative_host_map(include_master)
            .into_values()
            .map(|content_id| (content_id, construct_local_command(&generator(content_id))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_ssh_command() {
        assert_eq!(
            construct_ssh_command("u", "h", "cmd"),
            vec!["ssh", "-o", "StrictHostKeyChecking=no", "u@h", "cmd"]
        );
    }

    #[test]
    fn test_construct_local_command() {
        assert_eq!(construct_local_command("cmd"), vec!["bash", "-c", "cmd"]);
    }

    #[test]
    fn test_inner_command_is_one_argument() {
        let cmd = construct_ssh_command("gpadmin", "sdw1", "echo 'a b' && ls \"$HOME\"");
        assert_eq!(cmd.len(), 5);
        assert_eq!(cmd[4], "echo 'a b' && ls \"$HOME\"");
    }
}
