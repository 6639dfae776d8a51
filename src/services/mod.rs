//! Service layer for the docward client.
//!
//! This module contains the session logic for both audiences:
//! - Authoring console (`AdminConsole`): selection sync and optimistic CRUD
//! - Public reader (`Reader`): navigation, search-hit resolution, rendering

mod console;
mod reader;

pub use console::AdminConsole;
pub use reader::Reader;
