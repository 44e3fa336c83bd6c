// Terminal rendering of the task list

use crate::controller::View;
use crate::filter::Filter;
use crate::models::Task;
use crate::stats::Stats;
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Line-oriented view over an input reader and an output writer
pub struct TerminalView<R: BufRead, W: Write> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> TerminalView<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with yes
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Prompt and read one line; `None` at end of input
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    pub fn info(&mut self, message: impl Display) {
        self.line(message);
    }

    pub fn print_stats(&mut self, stats: &Stats) {
        self.line(format!("{} {}", "Total:".bold(), stats.total));
        self.line(format!("{} {}", "Completed:".bold(), stats.completed));
        self.line(format!("{} {}", "Pending:".bold(), stats.pending));
        self.line(format!("{} {}%", "Completion rate:".bold(), stats.completion_rate));
        self.line(format!("{} {}", "Created today:".bold(), stats.tasks_created_today));
    }

    fn line(&mut self, text: impl Display) {
        let _ = writeln!(self.output, "{}", text);
    }

    fn task_line(index: usize, task: &Task) -> String {
        let mark = if task.completed {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        let text = if task.completed {
            task.text.dimmed().strikethrough().to_string()
        } else {
            task.text.clone()
        };
        format!("{:>3}. {} {}  {}", index + 1, mark, text, task.id.dimmed())
    }

    fn meta_line(task: &Task) -> String {
        let mut meta = format!("Created: {}", local_time(task.created_at));
        if let Some(completed_at) = task.completed_at {
            meta.push_str(&format!(" • Completed: {}", local_time(completed_at)));
        }
        format!("       {}", meta.dimmed())
    }
}

impl<R: BufRead, W: Write> View for TerminalView<R, W> {
    fn render(&mut self, tasks: &[&Task], filter: Filter, stats: &Stats) {
        let counters = format!(
            "all {} · pending {} · completed {}",
            stats.total, stats.pending, stats.completed
        );
        self.line(format!("{} {}", format!("Tasks [{}]", filter).bold(), counters.dimmed()));

        if tasks.is_empty() {
            let (title, message) = filter.empty_message();
            self.line(format!("  {}", title.bold()));
            self.line(format!("  {}", message.dimmed()));
        } else {
            for (index, task) in tasks.iter().enumerate() {
                self.line(Self::task_line(index, task));
                self.line(Self::meta_line(task));
            }
        }

        if stats.completed > 0 {
            self.line(
                format!("  {} completed task(s) can be cleared", stats.completed).dimmed(),
            );
        }
    }

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {
        let _ = self.output.flush();
    }

    fn show_editor(&mut self, text: &str) {
        self.line(format!("{} {}", "Editing:".cyan().bold(), text));
        self.line("  save <new text> | cancel".dimmed());
    }

    fn hide_editor(&mut self) {}

    fn show_delete_prompt(&mut self, task: &Task) {
        self.line(format!("{} {}", "Delete task?".yellow().bold(), task.text));
        self.line("  confirm | cancel".dimmed());
    }

    fn hide_delete_prompt(&mut self) {}

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match self.read_line(&format!("{} [y/N] ", message)) {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    fn show_error(&mut self, message: &str) {
        self.line(format!("{} {}", "error:".red().bold(), message));
    }

    fn show_warning(&mut self, message: &str) {
        self.line(format!("{} {}", "warning:".yellow().bold(), message));
    }
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
