//! Fetch-and-record: the per-user operation a worker runs

use crate::harvest::error::FetchError;
use crate::harvest::traits::ItemProcessor;
use crate::harvest::types::{Client, WorkItem};
use crate::remote::traits::Transport;
use crate::sink::format::RecordFormat;
use crate::sink::traits::Sink;
use async_trait::async_trait;

pub const DEFAULT_FIELDS: &str = "education,universities,schools,status,last_seen";
pub const DEFAULT_WALL_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderSettings {
    /// Profile fields requested from `users.get`
    pub fields: String,
    /// Posts requested from `wall.get`
    pub wall_limit: usize,
    pub format: RecordFormat,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.to_string(),
            wall_limit: DEFAULT_WALL_LIMIT,
            format: RecordFormat::default(),
        }
    }
}

/// `users.get` then `wall.get` then one sink write
///
/// The chain stops at the first failing step; nothing is written for a user
/// unless both calls succeeded.
pub struct UserRecorder<T, S> {
    transport: T,
    sink: S,
    settings: RecorderSettings,
}

impl<T: Transport, S: Sink> UserRecorder<T, S> {
    pub fn new(transport: T, sink: S, settings: RecorderSettings) -> Self {
        Self {
            transport,
            sink,
            settings,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[async_trait]
impl<T: Transport, S: Sink> ItemProcessor for UserRecorder<T, S> {
    async fn process(&self, client: &Client, item: &WorkItem) -> Result<(), FetchError> {
        let credential = client.credential();

        let user = self
            .transport
            .call(
                credential,
                "users.get",
                vec![
                    ("user_ids", item.to_string()),
                    ("fields", self.settings.fields.clone()),
                ],
            )
            .await?;

        let wall = self
            .transport
            .call(
                credential,
                "wall.get",
                vec![
                    ("owner_id", item.to_string()),
                    ("offset", "0".to_string()),
                    ("count", self.settings.wall_limit.to_string()),
                ],
            )
            .await?;

        let record = self.settings.format.render(item, &user, &wall);
        self.sink.write(&record).await?;
        Ok(())
    }
}
