//! Text menu for the interactive application

use crate::tasks::{StepReport, StepStatus, Task, Tasks};
use console::style;
use enum_iterator::Sequence;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence)]
pub enum MainMenuChoice {
    Run(Task),
    Exit,
}

impl MainMenuChoice {
    fn key(self) -> u8 {
        match self {
            MainMenuChoice::Run(Task::Uninstall) => 1,
            MainMenuChoice::Run(Task::CleanRegistry) => 2,
            MainMenuChoice::Run(Task::ResetMachineId) => 3,
            MainMenuChoice::Run(Task::RunAll) => 4,
            MainMenuChoice::Exit => 0,
        }
    }

    fn title(self) -> &'static str {
        match self {
            MainMenuChoice::Run(task) => task.title(),
            MainMenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        enum_iterator::all::<MainMenuChoice>().find(|c| c.key().to_string() == input)
    }
}

/// Carries out the tasks selected from the menu
pub trait MenuHandler {
    /// Name shown in the menu header
    fn app_name(&self) -> &str;
    fn handle(&mut self, task: Task) -> Vec<StepReport>;
}

impl MenuHandler for Tasks {
    fn app_name(&self) -> &str {
        Tasks::app_name(self)
    }

    fn handle(&mut self, task: Task) -> Vec<StepReport> {
        self.run(task)
    }
}

fn write_menu<W: Write>(output: &mut W, app_name: &str) -> io::Result<()> {
    writeln!(output)?;
    writeln!(
        output,
        "===== {} Cleaner & Machine ID Reset Tool =====",
        app_name
    )?;
    writeln!(output)?;
    for choice in enum_iterator::all::<MainMenuChoice>() {
        writeln!(output, "{}. {}", choice.key(), choice.title())?;
    }
    writeln!(output)?;
    write!(output, "Your choice: ")?;
    output.flush()
}

fn write_report<W: Write>(output: &mut W, report: &StepReport) -> io::Result<()> {
    let symbol = match report.status {
        StepStatus::Success => style(report.status.symbol()).green(),
        StepStatus::Warning => style(report.status.symbol()).yellow(),
        StepStatus::Failure => style(report.status.symbol()).red(),
    };
    writeln!(output, "{} {}", symbol, report.message)
}

/// Reads a line, `None` on end of input
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Waits for the user to press enter, returns false on end of input
fn pause<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "\nPress Enter to continue...")?;
    output.flush()?;
    Ok(read_line(input)?.is_some())
}

/// Shows the menu until the user chooses to exit, or the input ends
pub fn run_menu<R, W, H>(input: &mut R, output: &mut W, handler: &mut H) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    H: MenuHandler,
{
    loop {
        write_menu(output, handler.app_name())?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(()),
        };
        match MainMenuChoice::parse(&line) {
            Some(MainMenuChoice::Exit) => {
                writeln!(output, "Goodbye.")?;
                return Ok(());
            }
            Some(MainMenuChoice::Run(task)) => {
                writeln!(output, "\n=== {} ===\n", task.title())?;
                for report in handler.handle(task) {
                    write_report(output, &report)?;
                }
                if !pause(input, output)? {
                    return Ok(());
                }
            }
            None => writeln!(output, "Invalid choice, try again.")?,
        }
    }
}
