//! Application layer coordinating list state, events, and actions.
//!
//! This module is the list-view controller sitting between a presentation
//! layer and the entity store. It follows a unidirectional data flow:
//!
//! ```text
//! User Input → Event → handle_event → State Mutations → Actions → processor::execute
//!                 ↑                                                      ↓
//!                 └──────────────── Event::StoreChanged ─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Store commands emitted by the event handler
//! - [`form`]: Add/edit employee form and its events
//! - [`handler`]: Event processing logic and state transitions
//! - [`modes`]: Tab, delete confirmation and grade editor states
//! - [`processor`]: Executes actions against the entity store
//! - [`state`]: List-view state and view model computation
//!
//! # Example
//!
//! ```
//! use staff_directory::app::{handle_event, processor, AppState, Event};
//! use staff_directory::storage::MemoryStorage;
//! use staff_directory::store::EntityStore;
//!
//! let mut store = EntityStore::open(Box::new(MemoryStorage::default()), "staff-storage");
//! let mut state = AppState::new(10);
//! let export_dir = std::env::temp_dir();
//!
//! for event in [
//!     Event::OpenGradeEditor { id: None },
//!     Event::EditGradeLevelName("Senior".into()),
//!     Event::SubmitGradeLevel,
//! ] {
//!     let (_render, actions) = handle_event(&mut state, &store.snapshot(), &event)?;
//!     for action in &actions {
//!         processor::execute(&mut store, action, &export_dir)?;
//!     }
//! }
//! assert_eq!(store.snapshot().grade_levels[0].name, "Senior");
//! # Ok::<(), staff_directory::DirectoryError>(())
//! ```

pub mod actions;
pub mod form;
pub mod handler;
pub mod modes;
pub mod processor;
pub mod state;

pub use actions::Action;
pub use form::{handle_form_event, EmployeeForm, FormEvent, FormField};
pub use handler::{handle_event, Event};
pub use modes::{GradeEditor, PendingDelete, Tab};
pub use processor::{execute, Effect, Outcome};
pub use state::AppState;
