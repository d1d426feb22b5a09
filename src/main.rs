//! Zellij plugin entry point.
//!
//! Thin shim between Zellij and the library: maps Zellij events to
//! [`tabula::Event`]s, runs [`handle_event`], and executes the returned
//! actions. All Zellij host calls live here so the library builds and tests
//! natively.
//!
//! # Keys
//!
//! | Key | Normal / browsing results | Typing a query |
//! |-----|---------------------------|----------------|
//! | `j`/`k`, `↓`/`↑` | move row cursor | `↓`/`↑` move, letters type |
//! | `h`/`l`, `←`/`→` | focus column | - |
//! | `o` | sort focused column | - |
//! | `1`-`9` | sort column N | - |
//! | `Space`, `Enter` | toggle row | `Enter` browses results |
//! | `a` | select all / clear | - |
//! | `/` | search / edit query | - |
//! | `Esc` | clear selection / leave search | leave search |
//! | `r` | reload dataset | - |
//! | `q` | close | - |

#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use tabula::worker::{DatasetWorker, WorkerMessage, WorkerResponse};
use tabula::{handle_event, Action, Config, Event};

register_plugin!(State);
register_worker!(TabulaWorker, tabula_worker, TABULA_WORKER);

/// Name shared by the worker registration and its replies.
const WORKER_NAME: &str = "tabula";

/// Zellij-facing wrapper around [`DatasetWorker`].
#[derive(Default, Serialize, Deserialize)]
struct TabulaWorker {
    #[serde(skip)]
    inner: DatasetWorker,
}

impl ZellijWorker<'_> for TabulaWorker {
    fn on_message(&mut self, message: String, payload: String) {
        let Some(response) = self.inner.on_payload(&payload) else {
            return;
        };
        post_message_to_plugin(PluginMessage {
            name: message,
            payload: response,
            worker_name: None,
        });
    }
}

struct State {
    app: tabula::AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: tabula::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        tabula::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();
        tracing::debug!(data_file = ?config.data_file, row_key = ?config.row_key, "parsed configuration");

        self.app = tabula::initialize(&config);

        request_permission(&[
            PermissionType::ReadApplicationState,
            PermissionType::ChangeApplicationState,
            PermissionType::FullHdAccess,
        ]);
        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let _guard = tracing::debug_span!("plugin_update_event", event_type = %event_name).entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                self.handle_permission_result(permissions);
                return false;
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in actions {
                    Self::execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        tabula::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::trace!(bare_key = ?key.bare_key, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                _ => None,
            };
        }

        if self.app.input_mode.is_typing() {
            return Some(match key.bare_key {
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Esc => Event::ExitSearch,
                BareKey::Enter => Event::FocusResults,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            });
        }

        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Left | BareKey::Char('h') => Event::ColumnLeft,
            BareKey::Right | BareKey::Char('l') => Event::ColumnRight,
            BareKey::Char('o') => Event::SortFocused,
            BareKey::Char(c @ '1'..='9') => Event::SortColumn(c as usize - '1' as usize),
            BareKey::Char(' ') | BareKey::Enter => Event::ToggleRow,
            BareKey::Char('a') => Event::ToggleSelectAll,
            BareKey::Char('/') => {
                if self.app.input_mode.is_search() {
                    Event::FocusSearchBar
                } else {
                    Event::SearchMode
                }
            }
            BareKey::Esc => Event::Escape,
            BareKey::Char('r') => Event::Reload,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    fn handle_permission_result(&self, permissions: PermissionStatus) {
        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted - loading dataset");
                Self::post_worker_message(&WorkerMessage::load_dataset(self.app.data_file.clone()));
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - dataset cannot be loaded");
            }
        }
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(kind = message.kind(), payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
            }
        }
    }

    fn execute_action(action: Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::PostToWorker(message) => Self::post_worker_message(&message),
        }
    }
}
