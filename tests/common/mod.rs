//! Common test utilities and helpers
//!
//! A stand-in for the VK API that answers from memory, with per-token and
//! per-user failure scripting.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use vkfetch::harvest::api::{Client, Credential, FetchError};
use vkfetch::remote::api::{Params, Transport};

#[derive(Default)]
pub struct FakeVk {
    /// Tokens the API rejects on every call
    revoked: Vec<String>,
    /// Remaining rate-limit errors per user id
    throttled: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeVk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(mut self, token: &str) -> Self {
        self.revoked.push(token.to_string());
        self
    }

    pub fn throttle(self, user_id: &str, times: usize) -> Self {
        self.throttled
            .lock()
            .unwrap()
            .insert(user_id.to_string(), times);
        self
    }

    /// `(token, method)` for every call made, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[async_trait]
impl Transport for FakeVk {
    async fn call(
        &self,
        credential: &Credential,
        method: &str,
        params: Params,
    ) -> Result<Value, FetchError> {
        let token = credential.expose().to_string();
        self.calls
            .lock()
            .unwrap()
            .push((token.clone(), method.to_string()));
        tokio::task::yield_now().await;

        if self.revoked.contains(&token) {
            return Err(FetchError::Api {
                method: method.to_string(),
                code: 5,
                message: "User authorization failed: invalid access_token".to_string(),
            });
        }

        match method {
            "users.get" => {
                let user_id = Self::param(&params, "user_ids").unwrap_or_default().to_string();
                let mut throttled = self.throttled.lock().unwrap();
                if let Some(remaining) = throttled.get_mut(&user_id) {
                    if *remaining > 0 {
                        *remaining -= 1;
                        return Err(FetchError::Api {
                            method: method.to_string(),
                            code: 6,
                            message: "Too many requests per second".to_string(),
                        });
                    }
                }
                Ok(json!([{ "id": user_id, "first_name": "Test" }]))
            }
            "wall.get" => {
                let count: usize = Self::param(&params, "count")
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(0);
                Ok(json!({ "count": count, "items": [] }))
            }
            other => Err(FetchError::decode(other, "unexpected method")),
        }
    }
}

pub fn clients(tokens: &[&str]) -> Vec<Client> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| Client::new(i, Credential::new(*token)))
        .collect()
}
