// Interactive line-based front end for the controller

use crate::controller::{Controller, Event, View};
use crate::store::TaskStore;
use crate::term::TerminalView;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

const HELP: &str = "\
Commands:
  add <text>        add a task
  toggle <ref>      mark a task done / not done
  edit <ref>        start editing a task
  save <text>       save the edit
  delete <ref>      ask to delete a task
  confirm           confirm the pending delete
  cancel            close the editor and any pending delete
  filter <name>     show all, pending or completed tasks
  clear             delete all completed tasks
  list              show tasks
  stats             show statistics
  export [path]     write a JSON backup
  import <path>     replace tasks from a JSON backup
  quit              save and exit

<ref> is a position in the current list or a unique id prefix.";

/// Resolve a user task reference to an id
///
/// A number is a 1-based position in the filtered list; anything else is
/// matched as an exact id or a unique id prefix.
pub fn resolve_ref(store: &TaskStore, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if let Ok(position) = reference.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| store.filtered_tasks().nth(index))
            .map(|t| t.id.clone());
    }

    if let Some(task) = store.get(reference) {
        return Some(task.id.clone());
    }

    let mut matches = store.tasks().iter().filter(|t| t.id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Some(task.id.clone()),
        _ => None,
    }
}

/// Read commands until `quit` or end of input
///
/// Sends a timer tick after every line and a lifecycle flush on exit.
pub fn run<R: BufRead, W: Write>(controller: &mut Controller<TerminalView<R, W>>) {
    controller.render();

    loop {
        let Some(line) = controller.view_mut().read_line("> ") else {
            break;
        };

        let (command, rest) = match line.trim().split_once(char::is_whitespace) {
            Some((command, rest)) => (command.to_string(), rest.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        };
        debug!(%command, "Shell command");

        if command == "quit" || command == "exit" {
            break;
        }
        execute(controller, &command, &rest);

        let _ = controller.handle(Event::Tick(Instant::now()));
    }

    let _ = controller.handle(Event::Hidden);
}

fn execute<R: BufRead, W: Write>(controller: &mut Controller<TerminalView<R, W>>, command: &str, rest: &str) {
    // Errors are already shown by the view
    let _ = match command {
        "" => Ok(()),
        "add" => controller.handle(Event::Submit(rest.to_string())),
        "save" => controller.handle(Event::SaveEdit(rest.to_string())),
        "toggle" | "edit" | "delete" => {
            let Some(id) = resolve_ref(controller.store(), rest) else {
                controller
                    .view_mut()
                    .show_error(&format!("No task matches '{}'", rest));
                return;
            };
            let event = match command {
                "toggle" => Event::Toggle(id),
                "edit" => Event::Edit(id),
                _ => Event::Delete(id),
            };
            controller.handle(event)
        }
        "confirm" | "yes" => controller.handle(Event::ConfirmDelete),
        "cancel" => controller.handle(Event::Escape),
        "filter" => controller.handle(Event::SelectFilter(rest.to_string())),
        "clear" => controller.handle(Event::ClearCompleted),
        "list" => {
            controller.render();
            Ok(())
        }
        "stats" => {
            let stats = controller.store().stats();
            controller.view_mut().print_stats(&stats);
            Ok(())
        }
        "export" => {
            export(controller, rest);
            Ok(())
        }
        "import" => match fs::read_to_string(rest) {
            Ok(data) => controller.handle(Event::Import(data)),
            Err(e) => {
                controller
                    .view_mut()
                    .show_error(&format!("Cannot read {}: {}", rest, e));
                Ok(())
            }
        },
        "help" => {
            controller.view_mut().info(HELP);
            Ok(())
        }
        other => {
            controller
                .view_mut()
                .info(format!("Unknown command '{}', try 'help'", other));
            Ok(())
        }
    };
}

fn export<R: BufRead, W: Write>(controller: &mut Controller<TerminalView<R, W>>, path: &str) {
    let (name, data) = match controller.export() {
        Ok(export) => export,
        Err(e) => {
            controller.view_mut().show_error(&format!("Export failed: {}", e));
            return;
        }
    };

    let path = if path.is_empty() { name } else { path.to_string() };
    match fs::write(Path::new(&path), data) {
        Ok(()) => controller.view_mut().info(format!("Exported to {}", path)),
        Err(e) => controller.view_mut().show_error(&format!("Export failed: {}", e)),
    }
}
