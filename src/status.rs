use serde::{Deserialize, Serialize};

/// Reachability of the inference server as last observed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServerStatus {
    #[default]
    Trying,
    Alive,
    Dead,
}

impl ServerStatus {
    pub fn from_probe(reachable: bool) -> Self {
        if reachable {
            ServerStatus::Alive
        } else {
            ServerStatus::Dead
        }
    }

    pub fn is_trying(self) -> bool {
        self == ServerStatus::Trying
    }

    pub fn is_alive(self) -> bool {
        self == ServerStatus::Alive
    }

    pub fn is_dead(self) -> bool {
        self == ServerStatus::Dead
    }
}
