// Event dispatch between a view and the task store

use crate::autosave::Autosave;
use crate::error::StoreError;
use crate::filter::Filter;
use crate::models::Task;
use crate::snapshot;
use crate::stats::Stats;
use crate::store::TaskStore;
use std::time::{Duration, Instant};
use tracing::debug;

/// User input and lifecycle events, keyed by task id where relevant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// New task text submitted
    Submit(String),
    Toggle(String),
    /// Open the editor for a task
    Edit(String),
    SaveEdit(String),
    CancelEdit,
    /// Ask for confirmation before deleting a task
    Delete(String),
    ConfirmDelete,
    CancelDelete,
    SelectFilter(String),
    ClearCompleted,
    /// Close any open editor or confirmation
    Escape,
    /// Global shortcut to jump to the input
    FocusShortcut,
    /// Periodic timer tick
    Tick(Instant),
    /// App moved to the background or is exiting
    Hidden,
    /// Snapshot text to replace the list with
    Import(String),
}

/// Presentation surface driven by the controller
pub trait View {
    fn render(&mut self, tasks: &[&Task], filter: Filter, stats: &Stats);
    fn clear_input(&mut self);
    fn focus_input(&mut self);
    fn show_editor(&mut self, text: &str);
    fn hide_editor(&mut self);
    fn show_delete_prompt(&mut self, task: &Task);
    fn hide_delete_prompt(&mut self);
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;
    fn show_error(&mut self, message: &str);
    fn show_warning(&mut self, message: &str);
}

pub struct Controller<V: View> {
    store: TaskStore,
    view: V,
    autosave: Autosave,
}

impl<V: View> Controller<V> {
    pub fn new(store: TaskStore, view: V, autosave_interval: Duration) -> Self {
        let mut controller = Self {
            store,
            view,
            autosave: Autosave::new(autosave_interval, Instant::now()),
        };
        // Load problems are reported before anything else
        controller.report_warnings();
        controller
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (TaskStore, V) {
        (self.store, self.view)
    }

    /// Apply one event, report errors and warnings, re-render on state changes
    pub fn handle(&mut self, event: Event) -> Result<(), StoreError> {
        debug!(?event, "Handling event");
        let rerender = !matches!(event, Event::Tick(_) | Event::Hidden | Event::FocusShortcut);

        let result = self.dispatch(event);
        if let Err(e) = &result {
            self.view.show_error(&e.to_string());
        }
        self.report_warnings();

        if rerender {
            self.render();
        }
        result
    }

    /// Redraw the filtered list and counters
    pub fn render(&mut self) {
        let tasks: Vec<&Task> = self.store.filtered_tasks().collect();
        let stats = self.store.stats();
        self.view.render(&tasks, self.store.filter(), &stats);
    }

    /// Backup file name (UTC date) and content for the current list
    pub fn export(&self) -> Result<(String, String), StoreError> {
        let name = snapshot::export_file_name(self.store.now().date_naive());
        let data = self.store.export()?;
        Ok((name, data))
    }

    fn dispatch(&mut self, event: Event) -> Result<(), StoreError> {
        match event {
            Event::Submit(text) => {
                self.store.add(&text)?;
                self.view.clear_input();
            }
            Event::Toggle(id) => {
                self.store.toggle(&id);
            }
            Event::Edit(id) => {
                if let Some(text) = self.store.begin_edit(&id) {
                    self.view.show_editor(&text);
                }
            }
            Event::SaveEdit(text) => {
                // Editor stays open on validation errors
                self.store.commit_edit(&text)?;
                self.view.hide_editor();
            }
            Event::CancelEdit => {
                self.store.cancel_edit();
                self.view.hide_editor();
            }
            Event::Delete(id) => {
                if let Some(task) = self.store.get(&id) {
                    self.view.show_delete_prompt(task);
                    self.store.request_delete(&id);
                }
            }
            Event::ConfirmDelete => {
                self.store.confirm_delete();
                self.view.hide_delete_prompt();
            }
            Event::CancelDelete => {
                self.store.cancel_delete();
                self.view.hide_delete_prompt();
            }
            Event::SelectFilter(name) => {
                let filter: Filter = name.parse()?;
                self.store.set_filter(filter);
            }
            Event::ClearCompleted => {
                let view = &mut self.view;
                self.store.clear_completed(|count| {
                    view.confirm(&format!(
                        "Are you sure you want to delete all {} completed tasks?",
                        count
                    ))
                });
            }
            Event::Escape => {
                self.store.cancel_edit();
                self.store.cancel_delete();
                self.view.hide_editor();
                self.view.hide_delete_prompt();
            }
            Event::FocusShortcut => self.view.focus_input(),
            Event::Tick(now) => {
                if self.autosave.due(now) && self.store.flush() {
                    debug!("Autosave wrote pending changes");
                }
            }
            Event::Hidden => {
                self.store.flush();
            }
            Event::Import(data) => {
                self.store.import(&data)?;
            }
        }
        Ok(())
    }

    fn report_warnings(&mut self) {
        for warning in self.store.take_warnings() {
            self.view.show_warning(&warning.to_string());
        }
    }
}
