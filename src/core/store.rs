//! Persisted store: the filesystem tree, the user registry and the active user.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_PROFILE, DEFAULT_USER, HOME_PREFIX, HOSTNAME, PROFILE_FILE, ROOT_USER,
};
use crate::core::VirtualFs;
use crate::core::path;
use crate::models::NodeKind;

/// Current time as a Unix timestamp in seconds.
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A registered account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Plaintext password
    pub password: String,
    pub is_admin: bool,
    /// Absolute path of the home directory
    pub home_dir: String,
}

/// Full persisted state, loaded and saved around every command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub root: VirtualFs,
    pub current_user: String,
    pub users: BTreeMap<String, UserRecord>,
}

impl Store {
    /// Home directory of `user`, falling back to `/home/<user>`.
    pub fn home_dir_of(&self, user: &str) -> String {
        self.users
            .get(user)
            .map(|u| u.home_dir.clone())
            .unwrap_or_else(|| format!("{}/{}", HOME_PREFIX, user))
    }

    /// Home directory of the current user.
    pub fn home_dir(&self) -> String {
        self.home_dir_of(&self.current_user)
    }

    /// Resolve a path argument for the current user.
    pub fn resolve(&self, arg: &str, current_path: &str) -> String {
        path::resolve(arg, current_path, &self.home_dir())
    }

    pub fn is_root(&self) -> bool {
        self.current_user == ROOT_USER
    }
}

/// Build the snapshot a first run starts from.
pub fn default_store(now: u64) -> Store {
    let mut fs = VirtualFs::empty(now);

    let dirs: [(&str, &str); 8] = [
        ("/home", ROOT_USER),
        ("/home/ubuntu", DEFAULT_USER),
        ("/etc", ROOT_USER),
        ("/bin", ROOT_USER),
        ("/usr/bin", ROOT_USER),
        ("/var/log", ROOT_USER),
        ("/tmp", ROOT_USER),
        ("/root", ROOT_USER),
    ];
    let files: [(&str, &str, String); 7] = [
        (
            "/home/ubuntu/welcome.txt",
            DEFAULT_USER,
            "Welcome to your simulated Ubuntu machine!\n\
             Everything you create here is saved between sessions.\n\
             Try 'help' to see what you can do."
                .to_string(),
        ),
        (
            "/home/ubuntu/.profile",
            DEFAULT_USER,
            DEFAULT_PROFILE.to_string(),
        ),
        (
            "/etc/passwd",
            ROOT_USER,
            "root:x:0:0:root:/root:/bin/bash\n\
             ubuntu:x:1000:1000:Ubuntu:/home/ubuntu:/bin/bash"
                .to_string(),
        ),
        ("/etc/hostname", ROOT_USER, HOSTNAME.to_string()),
        (
            "/etc/hosts",
            ROOT_USER,
            format!("127.0.0.1\tlocalhost\n127.0.1.1\t{}", HOSTNAME),
        ),
        (
            "/var/log/syslog",
            ROOT_USER,
            "kernel: Linux version 5.15.0-91-generic\n\
             systemd[1]: Started Session 1 of user ubuntu."
                .to_string(),
        ),
        (
            "/root/.profile",
            ROOT_USER,
            DEFAULT_PROFILE.to_string(),
        ),
    ];

    // fixed skeleton on an empty tree: creation cannot fail
    for (dir, owner) in dirs {
        let _ = fs.create_dir_all(dir, ROOT_USER, now);
        let _ = fs.set_owner(dir, owner);
    }
    for (file, owner, content) in files {
        let _ = fs.create_node(file, NodeKind::File, &content, owner, now);
    }

    let mut users = BTreeMap::new();
    users.insert(
        DEFAULT_USER.to_string(),
        UserRecord {
            password: DEFAULT_USER.to_string(),
            is_admin: true,
            home_dir: format!("{}/{}", HOME_PREFIX, DEFAULT_USER),
        },
    );
    users.insert(
        ROOT_USER.to_string(),
        UserRecord {
            password: "toor".to_string(),
            is_admin: true,
            home_dir: format!("/{}", ROOT_USER),
        },
    );

    Store {
        root: fs,
        current_user: DEFAULT_USER.to_string(),
        users,
    }
}

/// Profile path inside a home directory.
pub fn profile_path(home: &str) -> String {
    path::join(home, PROFILE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FsNode;

    #[test]
    fn test_default_users() {
        let store = default_store(0);
        assert_eq!(store.current_user, "ubuntu");
        assert_eq!(store.users["ubuntu"].password, "ubuntu");
        assert_eq!(store.users["root"].password, "toor");
        assert_eq!(store.users["root"].home_dir, "/root");
    }

    #[test]
    fn test_default_homes_exist() {
        let store = default_store(0);
        for user in store.users.values() {
            assert!(store.root.is_directory(&user.home_dir));
        }
    }

    #[test]
    fn test_default_skeleton() {
        let store = default_store(0);
        for dir in ["/etc", "/bin", "/usr/bin", "/var/log", "/tmp", "/root"] {
            assert!(store.root.is_directory(dir), "{dir} should exist");
        }
        for file in [
            "/home/ubuntu/welcome.txt",
            "/home/ubuntu/.profile",
            "/etc/passwd",
            "/etc/hostname",
            "/etc/hosts",
            "/var/log/syslog",
        ] {
            assert!(
                matches!(store.root.get_node(file), Some(FsNode::File { .. })),
                "{file} should be a file"
            );
        }
        assert_eq!(
            store.root.get_node("/home/ubuntu").unwrap().meta().owner,
            "ubuntu"
        );
        assert_eq!(store.root.get_node("/etc").unwrap().meta().owner, "root");
    }

    #[test]
    fn test_home_dir_fallback() {
        let store = default_store(0);
        assert_eq!(store.home_dir_of("ghost"), "/home/ghost");
        assert_eq!(store.home_dir(), "/home/ubuntu");
    }

    #[test]
    fn test_resolve_uses_current_user_home() {
        let mut store = default_store(0);
        assert_eq!(store.resolve("~", "/tmp"), "/home/ubuntu");
        store.current_user = "root".to_string();
        assert_eq!(store.resolve("~/x", "/tmp"), "/root/x");
    }

    #[test]
    fn test_snapshot_field_names() {
        let json = serde_json::to_value(default_store(0)).unwrap();
        assert_eq!(json["currentUser"], "ubuntu");
        assert_eq!(json["users"]["root"]["homeDir"], "/root");
        assert_eq!(json["users"]["root"]["isAdmin"], true);
        assert_eq!(json["root"]["type"], "directory");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = default_store(1234);
        let json = serde_json::to_string(&store).unwrap();
        let back: Store = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
